//! Service-specific error types

use cognito_auth::Stage;
use thiserror::Error;

/// Failures of the setup binary.
///
/// Configuration problems surface as `common::Error` through `anyhow`
/// context; these variants cover argument parsing and the provisioning run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid arguments: {0}")]
    Cli(String),

    #[error("Cognito setup failed to {stage}: {cause}")]
    Setup {
        stage: Stage,
        cause: cognito_auth::Error,
    },
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;
