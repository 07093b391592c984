//! Error types for conversation memory operations.
//!
//! This module provides the error hierarchy using `thiserror` for the memory
//! core, the summarization backends, transcript input, and CLI commands.

use thiserror::Error;

/// Result type alias for conversation memory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A role string did not name a known conversation role.
    #[error("invalid role: {role:?} (expected user, assistant, or system)")]
    InvalidRole {
        /// The rejected role string.
        role: String,
    },

    /// The summarization capability failed; memory state is unchanged.
    #[error("summarization failed: {0}")]
    Summarize(#[from] SummarizeError),

    /// Malformed transcript input.
    #[error("transcript line {line}: {reason}")]
    Transcript {
        /// 1-based line number.
        line: usize,
        /// Why the line was rejected.
        reason: String,
    },

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Failures of the external summarization call.
#[derive(Error, Debug)]
pub enum SummarizeError {
    /// The call did not finish within the configured timeout.
    #[error("timed out after {seconds}s")]
    Timeout {
        /// Timeout that elapsed, in seconds.
        seconds: u64,
    },

    /// Transport, authentication, or API-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered without any usable summary text.
    #[error("empty response")]
    EmptyResponse,

    /// The async runtime backing the call could not be built.
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

impl Error {
    /// Builds a configuration error from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Command(CommandError::OutputFormat(err.to_string()))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("invalid secrets file: {err}"))
    }
}
