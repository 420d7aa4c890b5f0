//! Commands that never touch the network or the local store.

use std::fs;
use std::io::Read;

use crate::api::{ApiError, ErrorBody, PartValue};
use crate::cli::commands::{take_flag, take_option};
use crate::cli::{output, CliError, CliResult};
use crate::currency::LocaleConfig;
use crate::forms::signup::password_strength;
use crate::utils::build_info;
use crate::wizard::review::{project_review, render_text};
use crate::wizard::{
    classify_contract_error, submission_error_key, ContractDraft, ContractPayload,
    ContractReviewData,
};

fn read_input(source: &str) -> Result<String, CliError> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(source)?)
    }
}

fn single_source(args: &[String], usage: &str) -> Result<String, CliError> {
    match args {
        [source] => read_input(source),
        _ => Err(CliError::InvalidArguments(format!("usage: exotrack_cli {usage}"))),
    }
}

pub fn strength(args: &[String]) -> CliResult {
    let [password] = args else {
        return Err(CliError::InvalidArguments(
            "usage: exotrack_cli strength <password>".into(),
        ));
    };
    output::line(password_strength(password).as_str());
    Ok(())
}

pub fn classify(args: &mut Vec<String>) -> CliResult {
    let edit = take_flag(args, "--edit");
    let status = take_option(args, "--status")?
        .map(|raw| {
            raw.parse::<u16>()
                .map_err(|_| CliError::InvalidArguments(format!("`{raw}` is not a status code")))
        })
        .transpose()?;
    let message = args.join(" ");

    let key = match status {
        Some(status) => {
            let body = if message.trim().is_empty() {
                ErrorBody::default()
            } else {
                ErrorBody::with_message(message)
            };
            submission_error_key(&ApiError::Status { status, body }, edit)
        }
        None => classify_contract_error(&message),
    };
    output::line(key);
    Ok(())
}

pub fn review(args: &[String]) -> CliResult {
    let raw = single_source(args, "review <file|->")?;
    let data: ContractReviewData = serde_json::from_str(&raw)?;
    print!("{}", render_text(&project_review(&data, &LocaleConfig::default())));
    Ok(())
}

pub fn payload(args: &mut Vec<String>) -> CliResult {
    let project_id = take_option(args, "--project-id")?;
    let contract_id = take_option(args, "--contract-id")?;
    let edit_project_id = take_option(args, "--edit-project-id")?;
    let raw = single_source(args, "payload <file|->")?;
    let draft: ContractDraft = serde_json::from_str(&raw)?;

    let edit = match (&edit_project_id, &contract_id) {
        (Some(project), Some(contract)) => Some((project.as_str(), contract.as_str())),
        (None, None) => None,
        _ => {
            return Err(CliError::InvalidArguments(
                "--contract-id and --edit-project-id go together".into(),
            ))
        }
    };
    let payload = ContractPayload::build(&draft, project_id.as_deref(), edit)?;
    for (name, value) in payload.to_multipart().parts() {
        if let PartValue::Text(text) = value {
            output::line(format!("{name}={text}"));
        }
    }
    Ok(())
}

pub fn version() -> CliResult {
    output::line(build_info::current().summary());
    Ok(())
}
