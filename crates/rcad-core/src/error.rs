//! Error taxonomy shared by every layer of the client.

use thiserror::Error;

/// Errors raised by the CAD client
#[derive(Debug, Clone, Error)]
pub enum CadError {
    /// Invalid or ambiguous caller input, detected before any network call
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// The remote service rejected a feature, or a local geometric
    /// precondition for building one failed
    #[error("Feature error: {message}")]
    Feature {
        message: String,
        /// Generated FeatureScript that produced the failure, if any
        script: Option<String>,
    },

    /// Transport-level failure
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code, when a response was received
        status: Option<u16>,
        /// Requested URL
        url: Option<String>,
        /// Raw response body
        body: Option<String>,
    },

    /// Contract violation inside this library
    #[error("Internal error: {0}")]
    Internal(String),

    /// Credential validation failed
    #[error("Authentication error: {0}")]
    Auth(String),
}

/// Result type for client operations
pub type CadResult<T> = Result<T, CadError>;

impl CadError {
    /// Create a parameter error
    pub fn parameter(message: impl Into<String>) -> Self {
        CadError::Parameter(message.into())
    }

    /// Create a feature error without script context
    pub fn feature(message: impl Into<String>) -> Self {
        CadError::Feature {
            message: message.into(),
            script: None,
        }
    }

    /// Create a feature error for a failed remote script
    pub fn script(message: impl Into<String>, script: impl Into<String>) -> Self {
        CadError::Feature {
            message: message.into(),
            script: Some(script.into()),
        }
    }

    /// Create an API error with no response attached
    pub fn api(message: impl Into<String>) -> Self {
        CadError::Api {
            message: message.into(),
            status: None,
            url: None,
            body: None,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CadError::Internal(message.into())
    }

    /// The script attached to a feature error, if any
    pub fn script_text(&self) -> Option<&str> {
        match self {
            CadError::Feature { script, .. } => script.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status attached to an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CadError::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CadError {
    fn from(e: serde_json::Error) -> Self {
        CadError::api(format!("Malformed JSON: {}", e))
    }
}
