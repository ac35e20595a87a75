//! Shared types for the Cognito setup workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
