//! services/client/src/error.rs
//!
//! Defines the primary error type for the entire `client` service.

use crate::config::ConfigError;
use controlpet_core::ports::{ApiError, AuthError};

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from a REST call.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Represents a failure of the login/session-resolution flows.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Represents a standard Input/Output error (e.g., the token file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
