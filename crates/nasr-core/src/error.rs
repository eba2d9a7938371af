//! Error types for Nasringine

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Nasringine operations
#[derive(Debug, Error)]
pub enum NasrError {
    #[error("Invalid key code {code} in binding #{index}")]
    InvalidKeyCode { index: usize, code: u32 },

    #[error("Invalid logical input id {id} (registered inputs: {count})")]
    InvalidLogicalId { id: u32, count: usize },

    #[error("Logical input id {id} in binding #{index} exceeds the limit of {limit} inputs")]
    InputIdOutOfRange { index: usize, id: u32, limit: usize },

    #[error("Malformed resource: field '{field}'{} {reason}", entry_suffix(.entry))]
    MalformedResource {
        field: String,
        entry: Option<usize>,
        reason: String,
    },

    #[error("Resource unreadable: {}: {source}", .path.display())]
    ResourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Audio error: {0}")]
    AudioError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn entry_suffix(entry: &Option<usize>) -> String {
    match entry {
        Some(i) => format!(" of entry {}:", i),
        None => ":".to_string(),
    }
}

impl NasrError {
    /// Shorthand for a shape violation in a loaded resource
    pub fn malformed(field: impl Into<String>, entry: Option<usize>, reason: impl Into<String>) -> Self {
        NasrError::MalformedResource {
            field: field.into(),
            entry,
            reason: reason.into(),
        }
    }
}

/// Result type alias for Nasringine operations
pub type Result<T> = std::result::Result<T, NasrError>;

impl From<serde_json::Error> for NasrError {
    fn from(err: serde_json::Error) -> Self {
        NasrError::malformed("<document>", None, err.to_string())
    }
}

impl From<toml::de::Error> for NasrError {
    fn from(err: toml::de::Error) -> Self {
        NasrError::ConfigError(err.to_string())
    }
}
