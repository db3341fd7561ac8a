//! Error types for Kino Presenter

use thiserror::Error;

/// Result type alias for presenter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Presenter error types
#[derive(Error, Debug)]
pub enum Error {
    // Request errors
    #[error("Stream URL not provided")]
    MissingStreamUrl,

    // Runtime errors
    #[error("Player setup failed: {0}")]
    Setup(String),

    #[error("Player runtime error{}: {}", code_suffix(.code), .message)]
    Runtime { code: Option<i64>, message: String },

    #[error("Control bar update failed: {0}")]
    ControlBar(String),

    // State errors
    #[error("Invalid presenter state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" {c}")).unwrap_or_default()
}

impl Error {
    /// Create a setup error
    pub fn setup(msg: impl Into<String>) -> Self {
        Error::Setup(msg.into())
    }

    /// Returns the error code for logs and host integrations
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingStreamUrl => "MISSING_STREAM_URL",
            Error::Setup(_) => "SETUP",
            Error::Runtime { .. } => "RUNTIME",
            Error::ControlBar(_) => "CONTROL_BAR",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Json(_) => "JSON",
        }
    }
}
