//! End-to-end provisioning run
//!
//! Creates the authorizer, fetches a token, and writes the env file, in that
//! order. The first failure ends the run: nothing is retried and external
//! resources created by earlier stages are left in place. The outcome is
//! tagged with the stage that failed so callers can report it precisely.

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use common::Secret;

use crate::authorizer::AuthorizerResult;
use crate::constants::TOKEN_PREVIEW_CHARS;
use crate::envfile;
use crate::error::Error;
use crate::gateway::IdentityGateway;

/// Step of the provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateAuthorizer,
    FetchToken,
    WriteConfig,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CreateAuthorizer => "create authorizer",
            Stage::FetchToken => "fetch access token",
            Stage::WriteConfig => "write configuration",
        };
        f.write_str(name)
    }
}

/// Result of a provisioning run.
#[derive(Debug)]
pub enum SetupOutcome {
    Success {
        result: AuthorizerResult,
        token: Secret<String>,
        /// Env files written, in output-directory order
        written: Vec<PathBuf>,
    },
    Failure {
        stage: Stage,
        cause: Error,
    },
}

impl SetupOutcome {
    /// Split into the authorizer/token pair or the failing stage and cause.
    pub fn into_result(
        self,
    ) -> std::result::Result<(AuthorizerResult, Secret<String>), (Stage, Error)> {
        match self {
            SetupOutcome::Success { result, token, .. } => Ok((result, token)),
            SetupOutcome::Failure { stage, cause } => Err((stage, cause)),
        }
    }
}

/// Provision `service_name` through `gateway` and write the env file into
/// every directory of `output_dirs`.
pub async fn run(
    gateway: &dyn IdentityGateway,
    service_name: &str,
    output_dirs: &[PathBuf],
) -> SetupOutcome {
    info!(service_name, "creating Cognito authorizer");
    let result = match gateway.create_authorizer(service_name).await {
        Ok(result) => result,
        Err(cause) => {
            return SetupOutcome::Failure {
                stage: Stage::CreateAuthorizer,
                cause,
            };
        }
    };

    let client_info = &result.client_info;
    info!(user_pool_id = %client_info.user_pool_id, "Cognito user pool");
    info!(client_id = %client_info.client_id, "Cognito app client");
    info!(client_secret = %client_info.client_secret, "Cognito client secret");
    info!(domain = %client_info.domain_prefix, "Cognito domain");
    info!(discovery_url = %result.discovery_url(), "discovery URL");

    info!("getting OAuth token");
    let token = match gateway.access_token(client_info).await {
        Ok(token) => token,
        Err(cause) => {
            return SetupOutcome::Failure {
                stage: Stage::FetchToken,
                cause,
            };
        }
    };
    info!(access_token = %token.preview(TOKEN_PREVIEW_CHARS), "access token issued");

    let contents = envfile::render(&result, &token);
    let written = match envfile::write(&contents, output_dirs).await {
        Ok(written) => written,
        Err(cause) => {
            return SetupOutcome::Failure {
                stage: Stage::WriteConfig,
                cause,
            };
        }
    };

    info!(files = written.len(), "Cognito setup completed successfully");
    SetupOutcome::Success {
        result,
        token,
        written,
    }
}
