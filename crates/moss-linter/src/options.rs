//! Adapter options and their validation.
//!
//! Options can be assembled in code or read from a TOML table:
//!
//! ```toml
//! executable = "mylint"
//! use_stdin = true
//! output_pattern = '(?P<line>\d+):(?P<column>\d+): (?P<severity>\w+): (?P<message>.*)'
//! severity_map = { E = "major", W = "normal" }
//! ```

use crate::extract::{CorrectionExtractor, OutputStrategy, PatternExtractor};
use crate::{ConfigurationError, Severity};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Option names accepted in a TOML table.
pub const KNOWN_OPTIONS: &[&str] = &[
    "executable",
    "name",
    "use_stdin",
    "use_stdout",
    "use_stderr",
    "output_pattern",
    "severity_map",
    "provides_correction",
    "diff_severity",
    "diff_message",
    "diff_merge_gap",
    "config_suffix",
    "prerequisite_check_command",
    "prerequisite_check_fail_message",
];

const DEFAULT_PREREQUISITE_FAIL_MESSAGE: &str = "Prerequisite check failed.";

/// Raw, unvalidated adapter options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinterOptions {
    /// Executable to run, a bare name looked up on `PATH` or a path.
    pub executable: String,

    /// Origin of diagnostics that carry none (defaults to the executable's stem).
    pub name: Option<String>,

    /// Pass the file content on stdin.
    #[serde(default)]
    pub use_stdin: bool,

    /// Inspect stdout. Defaults to `!use_stderr`.
    pub use_stdout: Option<bool>,

    /// Inspect stderr.
    #[serde(default)]
    pub use_stderr: bool,

    /// Regex with named groups matching one finding in the output.
    pub output_pattern: Option<String>,

    /// Severity label to level, replaces the default info/warning/error table.
    pub severity_map: Option<HashMap<String, Severity>>,

    /// The tool prints the corrected file instead of findings.
    #[serde(default)]
    pub provides_correction: bool,

    pub diff_severity: Option<Severity>,

    pub diff_message: Option<String>,

    /// Unchanged lines allowed between two changes reported as one diagnostic.
    pub diff_merge_gap: Option<usize>,

    /// Suffix of the generated config file (e.g. `.toml`).
    pub config_suffix: Option<String>,

    /// Command that must succeed for the tool to be considered usable.
    pub prerequisite_check_command: Option<Vec<String>>,

    pub prerequisite_check_fail_message: Option<String>,
}

impl LinterOptions {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Read options from a TOML table, rejecting unknown keys.
    pub fn from_table(table: toml::Table) -> Result<Self, ConfigurationError> {
        if let Some(unknown) = table.keys().find(|k| !KNOWN_OPTIONS.contains(&k.as_str())) {
            return Err(ConfigurationError::UnknownOption(unknown.clone()));
        }
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigurationError::Invalid(e.to_string()))
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        let table: toml::Table = source
            .parse()
            .map_err(|e: toml::de::Error| ConfigurationError::Invalid(e.to_string()))?;
        Self::from_table(table)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn use_stdin(mut self, enabled: bool) -> Self {
        self.use_stdin = enabled;
        self
    }

    pub fn use_stdout(mut self, enabled: bool) -> Self {
        self.use_stdout = Some(enabled);
        self
    }

    pub fn use_stderr(mut self, enabled: bool) -> Self {
        self.use_stderr = enabled;
        self
    }

    pub fn output_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.output_pattern = Some(pattern.into());
        self
    }

    pub fn severity_map<K: Into<String>>(
        mut self,
        map: impl IntoIterator<Item = (K, Severity)>,
    ) -> Self {
        self.severity_map = Some(map.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    pub fn provides_correction(mut self, enabled: bool) -> Self {
        self.provides_correction = enabled;
        self
    }

    pub fn diff_severity(mut self, severity: Severity) -> Self {
        self.diff_severity = Some(severity);
        self
    }

    pub fn diff_message(mut self, message: impl Into<String>) -> Self {
        self.diff_message = Some(message.into());
        self
    }

    pub fn diff_merge_gap(mut self, gap: usize) -> Self {
        self.diff_merge_gap = Some(gap);
        self
    }

    pub fn config_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config_suffix = Some(suffix.into());
        self
    }

    pub fn prerequisite_check<S: Into<String>>(
        mut self,
        command: impl IntoIterator<Item = S>,
        fail_message: Option<&str>,
    ) -> Self {
        self.prerequisite_check_command = Some(command.into_iter().map(Into::into).collect());
        self.prerequisite_check_fail_message = fail_message.map(str::to_string);
        self
    }

    /// Check that the options describe a consistent adapter.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.provides_correction {
            if self.diff_severity.is_some() {
                return Err(ConfigurationError::DiffOptionWithoutCorrection(
                    "diff_severity",
                ));
            }
            if self.diff_message.is_some() {
                return Err(ConfigurationError::DiffOptionWithoutCorrection("diff_message"));
            }
            if self.diff_merge_gap.is_some() {
                return Err(ConfigurationError::DiffOptionWithoutCorrection(
                    "diff_merge_gap",
                ));
            }
        }
        if self.provides_correction && self.output_pattern.is_some() {
            return Err(ConfigurationError::CorrectionWithPattern);
        }
        if self.severity_map.is_some() && self.output_pattern.is_none() {
            return Err(ConfigurationError::SeverityMapWithoutPattern);
        }
        if !self.provides_correction && self.output_pattern.is_none() {
            return Err(ConfigurationError::MissingOutputStrategy);
        }
        if self.output_stream().is_none() {
            return Err(ConfigurationError::NoOutputStream);
        }
        Ok(())
    }

    /// Validate and compile into the immutable configuration of an adapter.
    pub fn compile(self) -> Result<LinterConfig, ConfigurationError> {
        self.validate()?;
        let output_stream = self
            .output_stream()
            .ok_or(ConfigurationError::NoOutputStream)?;

        let name = self.name.unwrap_or_else(|| default_name(&self.executable));
        let strategy = match self.output_pattern {
            Some(pattern) => OutputStrategy::Pattern(Arc::new(PatternExtractor::new(
                &pattern,
                self.severity_map,
                name.as_str(),
            )?)),
            None => {
                let mut extractor = CorrectionExtractor::new(name.as_str());
                if let Some(message) = self.diff_message {
                    extractor.message = message;
                }
                if let Some(severity) = self.diff_severity {
                    extractor.severity = severity;
                }
                extractor.merge_gap = self.diff_merge_gap.unwrap_or(0);
                OutputStrategy::Correction(extractor)
            }
        };

        Ok(LinterConfig {
            executable: self.executable,
            name,
            use_stdin: self.use_stdin,
            output_stream,
            strategy,
            config_suffix: self.config_suffix,
            prerequisite_check_command: self.prerequisite_check_command,
            prerequisite_check_fail_message: self
                .prerequisite_check_fail_message
                .unwrap_or_else(|| DEFAULT_PREREQUISITE_FAIL_MESSAGE.to_string()),
        })
    }

    fn output_stream(&self) -> Option<OutputStream> {
        match (self.use_stdout.unwrap_or(!self.use_stderr), self.use_stderr) {
            (true, false) => Some(OutputStream::Stdout),
            (false, true) => Some(OutputStream::Stderr),
            (true, true) => Some(OutputStream::Both),
            (false, false) => None,
        }
    }
}

fn default_name(executable: &str) -> String {
    Path::new(executable)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| executable.to_string())
}

/// Which output stream carries the findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
    /// stdout followed by stderr.
    Both,
}

impl OutputStream {
    pub fn select(self, stdout: String, stderr: String) -> String {
        match self {
            Self::Stdout => stdout,
            Self::Stderr => stderr,
            Self::Both => stdout + &stderr,
        }
    }
}

/// Validated, immutable adapter configuration.
#[derive(Debug, Clone)]
pub struct LinterConfig {
    pub executable: String,
    pub name: String,
    pub use_stdin: bool,
    pub output_stream: OutputStream,
    pub strategy: OutputStrategy,
    pub config_suffix: Option<String>,
    pub prerequisite_check_command: Option<Vec<String>>,
    pub prerequisite_check_fail_message: String,
}
