//! Prompt-driven flows that talk to the API.

use dialoguer::theme::ColorfulTheme;

use crate::api::contract::UploadedFile;
use crate::api::ApiClient;
use crate::cli::commands::take_option;
use crate::cli::{io, output, CliError, CliResult};
use crate::config::{ClientConfig, ConfigManager};
use crate::forms::signup::{password_strength, SignUpError, SignUpFlow};
use crate::utils::persistence::LocalStore;
use crate::wizard::review::{project_review, render_text};
use crate::wizard::{ContractInfo, ContractWizard, WizardError, WizardRoute, WizardStep};

struct Session {
    config: ClientConfig,
    store: LocalStore,
    client: ApiClient,
}

fn open_session() -> Result<Session, CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?.apply_env_overrides()?;
    let client = ApiClient::from_config(&config)?;
    let store = manager.local_store();
    client.set_token(store.token()?);
    Ok(Session {
        config,
        store,
        client,
    })
}

pub async fn signup() -> CliResult {
    let session = open_session()?;
    let flow = SignUpFlow::new(&session.client, &session.store, &session.config.language);
    let mut values = flow.resume(&session.config.default_country_code)?;
    let theme = ColorfulTheme::default();

    loop {
        values.first_name = io::prompt_text(&theme, "First name", &values.first_name)?;
        values.last_name = io::prompt_text(&theme, "Last name", &values.last_name)?;
        values.email = io::prompt_text(&theme, "Email", &values.email)?;
        values.country_code = io::prompt_text(&theme, "Country code", &values.country_code)?;
        values.mobile = io::prompt_text(&theme, "Mobile", &values.mobile)?;
        values.company_name = io::prompt_text(&theme, "Organization", &values.company_name)?;
        values.password = io::prompt_secret(&theme, "Password")?;
        io::print_info(format!(
            "Password strength: {}",
            password_strength(&values.password).as_str()
        ));
        values.confirm_password = io::prompt_secret(&theme, "Confirm password")?;
        let terms = io::confirm_action(&theme, "Accept the terms and privacy policy?", false)?;

        match flow.submit(&values, terms).await {
            Ok(outcome) => {
                output::toast(&outcome.toast);
                io::print_info(format!("Next: {}", outcome.navigate_to));
                return Ok(());
            }
            Err(SignUpError::Invalid(errors)) => {
                output::field_errors(&errors);
                if !io::confirm_action(&theme, "Edit and retry?", true)? {
                    return Ok(());
                }
            }
            Err(SignUpError::TermsNotAccepted) => {
                output::toast(&SignUpError::TermsNotAccepted.toast());
                if !io::confirm_action(&theme, "Edit and retry?", true)? {
                    return Ok(());
                }
            }
            Err(err) => {
                output::toast(&err.toast());
                return Err(err.into());
            }
        }
    }
}

fn prompt_info(theme: &ColorfulTheme, current: &ContractInfo) -> Result<ContractInfo, CliError> {
    let ids = current
        .contract_files
        .iter()
        .map(|file| file.id.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let documents = io::prompt_text(theme, "Document ids (comma separated)", &ids)?;
    Ok(ContractInfo {
        name: io::prompt_text(theme, "Contract name", &current.name)?,
        reference: io::prompt_text(theme, "Contract reference", &current.reference)?,
        signed_by: io::prompt_text(theme, "Signed by", &current.signed_by)?,
        position: io::prompt_text(theme, "Position", &current.position)?,
        organization: io::prompt_text(theme, "Organization", &current.organization)?,
        amount: io::prompt_text(theme, "Amount", &current.amount)?,
        currency: io::prompt_text(theme, "Currency", &current.currency)?,
        date_of_signing: io::prompt_text(
            theme,
            "Date of signing (DD-MM-YYYY)",
            &current.date_of_signing,
        )?,
        place: io::prompt_text(theme, "Place of signing", &current.place)?,
        contract_files: documents
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| UploadedFile {
                id: id.to_string(),
                original_name: None,
                file: None,
            })
            .collect(),
    })
}

pub async fn contract(args: &mut Vec<String>) -> CliResult {
    let route = WizardRoute {
        project_id: take_option(args, "--project-id")?,
        contract_id: take_option(args, "--contract-id")?,
    };
    if !args.is_empty() {
        return Err(CliError::InvalidArguments(format!(
            "unexpected arguments: {}",
            args.join(" ")
        )));
    }
    let session = open_session()?;
    let theme = ColorfulTheme::default();
    let mut wizard = ContractWizard::new(&session.client, route);
    wizard.load().await;

    loop {
        if wizard.current_step() == WizardStep::Info {
            output::section(WizardStep::Info.title());
            let info = prompt_info(&theme, &wizard.draft().to_info())?;
            if let Err(err) = wizard.submit_info(info) {
                match err {
                    WizardError::Invalid(errors) => output::field_errors(&errors),
                    other => return Err(other.into()),
                }
                continue;
            }
        }

        output::section(WizardStep::Review.title());
        print!(
            "{}",
            render_text(&project_review(wizard.review_data(), &session.config.locale))
        );
        if !io::confirm_action(&theme, "Submit this contract?", true)? {
            wizard.click_step(WizardStep::Info.index());
            continue;
        }

        return match wizard.submit().await {
            Ok(outcome) => {
                output::toast(&outcome.toast);
                io::print_info(format!("Contract link: {}", outcome.link));
                wizard.close_confirmation();
                Ok(())
            }
            Err(err) => {
                io::print_error(err.message_key());
                Err(err.into())
            }
        };
    }
}
