use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};

use crate::cli::output;
use crate::cli::CliError;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(theme: &ColorfulTheme, prompt: &str, default: bool) -> Result<bool, CliError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CliError::from)
}

/// Prompt for free-form text, pre-filled with `initial` when it is non-empty.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str, initial: &str) -> Result<String, CliError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if !initial.is_empty() {
        input = input.with_initial_text(initial);
    }
    input.interact_text().map_err(CliError::from)
}

/// Prompt for a secret without echoing it.
pub fn prompt_secret(theme: &ColorfulTheme, prompt: &str) -> Result<String, CliError> {
    Password::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(CliError::from)
}
