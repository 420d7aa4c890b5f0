//! `exotrack_cli`: offline helpers plus interactive sign-up and contract flows.

pub mod commands;
pub mod io;
pub mod output;

use thiserror::Error;

use crate::api::ApiError;
use crate::errors::ClientError;
use crate::forms::signup::SignUpError;
use crate::wizard::WizardError;

pub use commands::run_cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("unknown command `{0}`; run `exotrack_cli help`")]
    UnknownCommand(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    SignUp(#[from] SignUpError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

pub type CliResult = Result<(), CliError>;
