//! Error types for trigger-spool.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid trigger key: {0}")]
    InvalidTriggerKey(String),

    #[error("{service} call failed: {message}")]
    Collaborator {
        service: &'static str,
        message: String,
    },

    #[error("{service} call timed out after {after_ms}ms")]
    Timeout { service: &'static str, after_ms: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trigger file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a rejected external call.
    pub fn collaborator(service: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            service,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
