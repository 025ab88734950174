//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::configure::ConfigureError;
use crate::retention::RetentionError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/input files)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// No snapshot with the requested sequence number
    NotFound,
    /// Error raised by the history itself
    History(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CONFHIST_CLI_CONFIG_ERROR",
            Self::IoError => "CONFHIST_CLI_IO_ERROR",
            Self::AlreadyInitialized => "CONFHIST_CLI_ALREADY_INITIALIZED",
            Self::NotFound => "CONFHIST_CLI_NOT_FOUND",
            Self::History(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized(what: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("{} already exists", what),
        )
    }

    /// Unknown snapshot
    pub fn not_found(sequence: u64) -> Self {
        Self::new(
            CliErrorCode::NotFound,
            format!("No retained snapshot with sequence {}", sequence),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::History(e.code()), e.to_string())
    }
}

// Validation failures keep the user-facing wording; everything else keeps
// the detailed message since the operator reading stderr can act on it.
impl From<RetentionError> for CliError {
    fn from(e: RetentionError) -> Self {
        let message = if e.is_user_correctable() {
            e.user_message()
        } else {
            e.to_string()
        };
        Self::new(CliErrorCode::History(e.code()), message)
    }
}

impl From<ConfigureError> for CliError {
    fn from(e: ConfigureError) -> Self {
        match e {
            ConfigureError::Retention(e) => e.into(),
            ConfigureError::Config(e) => e.into(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
