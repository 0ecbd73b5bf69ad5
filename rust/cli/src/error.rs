//! Error type for the CLI.
//!
//! Library crates report through their own `thiserror` enums; this layer
//! folds them into one enum that knows how to print itself and which exit
//! code it maps to.

use crate::exit_code;
use std::fmt;
use trivium_bank::BankError;
use trivium_engine::errors::FetchError;
use trivium_runtime::RuntimeError;

#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdin, stdout/stderr writes, config file reads)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// The question bank could not be reached or returned an error
    Fetch(FetchError),

    /// The quiz controller stopped or rejected a command
    Runtime(String),

    /// Operation was interrupted (e.g., by user with Ctrl+C)
    Interrupted(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => exit_code::INTERRUPTED,
            _ => exit_code::ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Fetch(e) => write!(f, "{}", e),
            CliError::Runtime(msg) => write!(f, "Quiz error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<FetchError> for CliError {
    fn from(error: FetchError) -> Self {
        CliError::Fetch(error)
    }
}

impl From<BankError> for CliError {
    fn from(error: BankError) -> Self {
        match error {
            BankError::Fetch(e) => CliError::Fetch(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

impl From<RuntimeError> for CliError {
    fn from(error: RuntimeError) -> Self {
        CliError::Runtime(error.to_string())
    }
}
