use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the arithmetic engine and the calculator state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// An operator outside `+ - * / **` was about to be stored.
    /// This is an integration error, not something a user can fix.
    #[error("Operator Value Error: {0:?}")]
    InvalidOperator(String),

    #[error("Can not divide by zero")]
    DivisionByZero,
}

/// A typed line could not be turned into key presses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct KeyError {
    pub message: String,
    /// Byte offset into the input line.
    pub position: usize,
}

impl KeyError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
