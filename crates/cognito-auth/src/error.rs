//! Error types for provisioning operations

/// Errors from gateway calls, token exchange, and env file persistence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("identity gateway error: {0}")]
    Gateway(String),

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias for provisioning operations.
pub type Result<T> = std::result::Result<T, Error>;
