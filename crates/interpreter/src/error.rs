//! Interpreter error types.

use std::path::PathBuf;

use domain::{ErrorKind, ParseError, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A line that could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A double quote was opened but never closed.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// The first token is not a known command keyword.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// The command received the wrong number of arguments.
    #[error("{command} expects {expected} argument(s), found {found}")]
    ArgumentCount {
        command: String,
        expected: String,
        found: usize,
    },

    /// An integer argument did not parse.
    #[error("invalid {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A domain value (enum, money) did not parse.
    #[error(transparent)]
    InvalidValue(#[from] ParseError),

    /// The line bytes are not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

/// Why a single line failed.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize result: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl ExecutionError {
    /// Label used for the error counter and log records.
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionError::Syntax(_) => "syntax",
            ExecutionError::Store(err) => err.kind.as_str(),
            ExecutionError::Snapshot(_) => "snapshot",
        }
    }
}

/// A failed line in a script, reported with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("line {line_number}: {command}: {reason}")]
pub struct CommandError {
    /// Command keyword, e.g. `add-basket-item`.
    pub command: String,
    pub reason: String,
    pub line_number: usize,
    /// Set when the engine rejected the command; absent for malformed lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// The trimmed line as written in the script.
    #[serde(default)]
    pub line: String,
}

impl CommandError {
    pub fn new(
        line_number: usize,
        command: impl Into<String>,
        line: impl Into<String>,
        error: &ExecutionError,
    ) -> Self {
        let kind = match error {
            ExecutionError::Store(err) => Some(err.kind),
            _ => None,
        };
        Self {
            command: command.into(),
            reason: error.to_string(),
            line_number,
            kind,
            line: line.into(),
        }
    }
}

/// Failure to read a script source at all.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to open script {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
