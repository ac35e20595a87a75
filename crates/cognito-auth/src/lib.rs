//! Cognito OAuth authorizer provisioning
//!
//! Creates an OAuth authorizer through an identity gateway, exchanges the
//! issued client credentials for an access token, and persists both as a
//! shell-sourceable env file. The library has no dependency on the CLI
//! binary, so other tools can drive the same flow with their own gateway.
//!
//! Provisioning flow:
//! 1. `IdentityGateway::create_authorizer()` provisions the authorizer
//! 2. `IdentityGateway::access_token()` runs the client-credentials grant
//! 3. `envfile::render()` formats the export lines
//! 4. `envfile::write()` persists them to every output directory
//!
//! `provision::run()` executes those steps in order and reports which stage
//! failed, if any.

pub mod authorizer;
pub mod constants;
pub mod envfile;
pub mod error;
pub mod gateway;
pub mod provision;
pub mod token;

pub use authorizer::{AuthorizerConfig, AuthorizerResult, ClientInfo, CustomJwtAuthorizer};
pub use common::Secret;
pub use constants::*;
pub use error::{Error, Result};
pub use gateway::{HttpGateway, IdentityGateway};
pub use provision::{SetupOutcome, Stage};
pub use token::{TokenResponse, cognito_token_endpoint, request_client_credentials};
