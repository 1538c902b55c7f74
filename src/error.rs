// file: src/error.rs
// version: 1.0.0
// guid: 490aaa32-9b67-4a52-9c7a-0477a87082c8

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, PostInstallError>;

/// Error types for the post-install run
#[derive(Error, Debug)]
pub enum PostInstallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Command `{command}` failed (exit code {exit_code:?}): {stderr}")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("User lookup error: {0}")]
    User(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PostInstallError {
    /// Create a new permission error
    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Create a new prompt error
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Create a new user lookup error
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Whether this error must stop the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Permission(_) | Self::Logging(_))
    }
}
