//! Diagnostic types produced by every linter adapter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels for diagnostics, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note.
    Minor,
    /// Potential problem, should be fixed.
    Normal,
    /// Real problem, must be fixed.
    Major,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Normal => "normal",
            Self::Major => "major",
        }
    }

    /// Map a tool's severity label using the default table.
    ///
    /// `info` maps to [`Severity::Minor`], `warning` to [`Severity::Normal`] and
    /// `error` to [`Severity::Major`]. Matching is case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "info" => Some(Self::Minor),
            "warning" => Some(Self::Normal),
            "error" => Some(Self::Major),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source location of a diagnostic.
///
/// Positions are 1-based as reported by the tool. `None` means the tool did not
/// report that coordinate; values are kept verbatim, so a tool reporting line 0
/// yields `Some(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path the diagnostic refers to.
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl Location {
    /// A location covering the whole file.
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
            end_line: None,
            end_column: None,
        }
    }

    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            ..Self::file(file)
        }
    }

    /// Whole lines `start..=end`, without column information.
    pub fn lines(file: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            line: Some(start),
            end_line: Some(end),
            ..Self::file(file)
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }
}

/// A single diagnostic from a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What produced this diagnostic (tool name or the tool's own origin label).
    pub origin: String,
    /// Human-readable message.
    pub message: String,
    pub severity: Severity,
    pub location: Location,
    /// Proposed correction, only attached by correcting tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Patch>,
}

impl Diagnostic {
    pub fn new(
        origin: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        location: Location,
    ) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
            severity,
            location,
            patch: None,
        }
    }

    pub fn with_patch(mut self, patch: Patch) -> Self {
        self.patch = Some(patch);
        self
    }
}

/// Replace `old_len` lines starting at 1-based line `old_start` with `new_lines`.
///
/// A pure insertion has `old_len == 0` and inserts before line `old_start`.
/// Lines keep their line endings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineReplacement {
    pub old_start: usize,
    pub old_len: usize,
    pub new_lines: Vec<String>,
}

/// Ordered, non-overlapping line replacements that transform the original file
/// content into the corrected content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub replacements: Vec<LineReplacement>,
}

impl Patch {
    pub fn new(replacements: Vec<LineReplacement>) -> Self {
        Self { replacements }
    }

    /// Apply the patch to `original`.
    ///
    /// Returns `None` if the replacements are out of order, overlap, or reach
    /// past the end of the file.
    pub fn apply(&self, original: &str) -> Option<String> {
        let lines: Vec<&str> = original.split_inclusive('\n').collect();
        let mut out = String::with_capacity(original.len());
        // 0-based index of the next original line to copy
        let mut cursor = 0;

        for replacement in &self.replacements {
            let start = replacement.old_start.checked_sub(1)?;
            let end = start.checked_add(replacement.old_len)?;
            if start < cursor || end > lines.len() {
                return None;
            }
            lines[cursor..start].iter().for_each(|l| out.push_str(l));
            replacement.new_lines.iter().for_each(|l| out.push_str(l));
            cursor = end;
        }

        lines[cursor..].iter().for_each(|l| out.push_str(l));
        Some(out)
    }
}

impl Extend<LineReplacement> for Patch {
    fn extend<T: IntoIterator<Item = LineReplacement>>(&mut self, iter: T) {
        self.replacements.extend(iter);
    }
}
