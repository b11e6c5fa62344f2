//! Error types for provider operations.
//!
//! Provider operations surface failures to the host platform as boolean
//! returns; these error types carry the detail internally and into logs.

use thiserror::Error;

/// Errors raised while driving the provider state machine
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Property store error: {message}")]
    Store { message: String },

    #[error("Mail dispatch error: {message}")]
    Mail { message: String },
}

impl ProviderError {
    /// Wraps a property store failure message
    pub fn store(message: impl Into<String>) -> Self {
        ProviderError::Store { message: message.into() }
    }

    /// Wraps a mail dispatch failure message
    pub fn mail(message: impl Into<String>) -> Self {
        ProviderError::Mail { message: message.into() }
    }

    /// Wraps an input validation failure message
    pub fn validation(message: impl Into<String>) -> Self {
        ProviderError::Validation { message: message.into() }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::store("connection refused");
        assert_eq!(err.to_string(), "Property store error: connection refused");

        let err = ProviderError::validation("invalid email");
        assert_eq!(err.to_string(), "Validation error: invalid email");
    }
}
