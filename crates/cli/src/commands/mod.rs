//! Command implementations.
//!
//! Every command prints its result as JSON on stdout. Failures are returned
//! as [`CommandError`] and logged by `main`.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod landing;
pub mod sales;
pub mod users;

use serde::Serialize;
use thiserror::Error;

use vitrina_client::{
    ConfigError, GatewayError, Outcome, Rejection, StoreError, WorkflowError,
};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    #[error("Local state error: {0}")]
    Store(#[from] StoreError),

    /// The backend refused the request.
    #[error("Request rejected ({}): {}", .0.status, .0.message)]
    Rejected(#[from] Rejection),

    #[error("Not signed in. Run `vitrina auth login` first.")]
    NotSignedIn,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Unwrap an accepted outcome, turning a rejection into an error.
pub fn accepted<T>(outcome: Outcome<T>) -> Result<T, CommandError> {
    Ok(outcome.into_result()?)
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
