//! Error types for linter adapters.

use thiserror::Error;

/// Error raised by a [`LinterHandler`](crate::LinterHandler) callback.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid combination of adapter options, detected when the adapter is built.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("`{0}` requires `provides_correction`")]
    DiffOptionWithoutCorrection(&'static str),
    #[error("`provides_correction` and `output_pattern` are mutually exclusive")]
    CorrectionWithPattern,
    #[error("`severity_map` requires `output_pattern`")]
    SeverityMapWithoutPattern,
    #[error("either `output_pattern` or `provides_correction` must be set")]
    MissingOutputStrategy,
    #[error("`use_stdout` and `use_stderr` are both disabled, no output to inspect")]
    NoOutputStream,
    #[error("invalid output pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("output pattern has no `{0}` capture group")]
    MissingCaptureGroup(&'static str),
    #[error("invalid options: {0}")]
    Invalid(String),
}

/// The wrapped tool cannot be run on this host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PrerequisiteUnmet {
    pub reason: String,
}

impl PrerequisiteUnmet {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure while preparing or running the tool.
#[derive(Debug, Error)]
pub enum LinterError {
    #[error("empty command")]
    EmptyCommand,
    #[error("failed to start `{executable}`: {source}")]
    ProcessStart {
        executable: String,
        source: std::io::Error,
    },
    #[error("I/O error while running `{executable}`: {source}")]
    ProcessIo {
        executable: String,
        source: std::io::Error,
    },
    #[error("failed to write config file for `{executable}`: {source}")]
    ConfigWrite {
        executable: String,
        source: std::io::Error,
    },
    #[error("handler for `{executable}` failed: {source}")]
    Handler {
        executable: String,
        source: HandlerError,
    },
}

/// A single match of the output pattern could not be turned into a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("unknown severity `{severity}` in `{snippet}`")]
    UnknownSeverity { severity: String, snippet: String },
    #[error("invalid number `{value}` for `{group}` in `{snippet}`")]
    InvalidNumber {
        group: &'static str,
        value: String,
        snippet: String,
    },
    #[error("no `{group}` captured in `{snippet}`")]
    MissingGroup {
        group: &'static str,
        snippet: String,
    },
}
