//! Error types for the Veritrans client
//!
//! Only local, pre-flight problems are represented here. Anything that goes
//! wrong on the wire is folded into an [`ApiResult`](crate::types::ApiResult)
//! by the executor and never surfaces as a [`VeritransError`].

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, VeritransError>;

/// Errors raised by the request execution layer
#[derive(Debug, Error)]
pub enum VeritransError {
    /// Missing or unusable client configuration (e.g. no server key)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The request could not be constructed (bad URL, unknown method)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Parameters or a payload could not be encoded / decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The audit sink rejected an entry
    #[error("Audit log error: {message}")]
    Audit { message: String },
}

impl VeritransError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an audit sink error
    pub fn audit(message: impl Into<String>) -> Self {
        Self::Audit {
            message: message.into(),
        }
    }

    /// Whether this error is a configuration problem
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<url::ParseError> for VeritransError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_request(format!("Invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = VeritransError::config("Please add server_key to the client config");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Configuration error: Please add server_key to the client config"
        );
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: VeritransError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, VeritransError::InvalidRequest { .. }));
        assert!(!err.is_config());
    }
}
