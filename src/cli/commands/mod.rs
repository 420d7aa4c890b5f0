pub mod interactive;
pub mod offline;

use crate::cli::{output, CliError, CliResult};

#[derive(Clone, Copy, Debug)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

impl CommandDefinition {
    pub const fn new(name: &'static str, description: &'static str, usage: &'static str) -> Self {
        Self {
            name,
            description,
            usage,
        }
    }
}

pub fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "strength",
            "Rate a password as weak, acceptable or strong",
            "strength <password>",
        ),
        CommandDefinition::new(
            "classify",
            "Map a server error message to its contract error key",
            "classify [--status <code>] [--edit] <message>",
        ),
        CommandDefinition::new(
            "review",
            "Render review data (JSON file or `-` for stdin)",
            "review <file|->",
        ),
        CommandDefinition::new(
            "payload",
            "Show the multipart fields a contract draft would submit",
            "payload <file|-> [--project-id <id>] [--contract-id <id> --edit-project-id <id>]",
        ),
        CommandDefinition::new("signup", "Interactive sign-up", "signup"),
        CommandDefinition::new(
            "contract",
            "Interactive contract wizard",
            "contract [--project-id <id>] [--contract-id <id>]",
        ),
        CommandDefinition::new("version", "Show build metadata", "version"),
        CommandDefinition::new("help", "Show available commands", "help [command]"),
    ]
}

fn print_help(topic: Option<&str>) -> CliResult {
    let commands = definitions();
    if let Some(name) = topic {
        let command = commands
            .iter()
            .find(|command| command.name == name)
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
        output::line(format!("usage: exotrack_cli {}", command.usage));
        output::line(format!("  {}", command.description));
        return Ok(());
    }
    output::line("usage: exotrack_cli <command> [args]");
    for command in &commands {
        output::line(format!("  {:<10} {}", command.name, command.description));
    }
    Ok(())
}

/// Entry point used by the binary; `args` excludes the program name.
pub async fn run_cli(args: Vec<String>) -> CliResult {
    let Some((command, rest)) = args.split_first() else {
        return print_help(None);
    };
    let mut rest = rest.to_vec();
    match command.as_str() {
        "strength" => offline::strength(&rest),
        "classify" => offline::classify(&mut rest),
        "review" => offline::review(&rest),
        "payload" => offline::payload(&mut rest),
        "version" | "--version" | "-V" => offline::version(),
        "help" | "--help" | "-h" => print_help(rest.first().map(String::as_str)),
        "signup" => interactive::signup().await,
        "contract" => interactive::contract(&mut rest).await,
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

/// Removes `flag` from `args`, reporting whether it was present.
pub(crate) fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|arg| arg == flag) {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    }
}

/// Removes `name <value>` from `args` and returns the value.
pub(crate) fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>, CliError> {
    let Some(index) = args.iter().position(|arg| arg == name) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(CliError::InvalidArguments(format!("{name} needs a value")));
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}
