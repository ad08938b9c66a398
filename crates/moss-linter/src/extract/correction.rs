//! Diff-based extraction for tools that print corrected file content.

use crate::{Diagnostic, LineReplacement, Location, Patch, Severity};
use similar::{Algorithm, DiffOp, DiffTag};
use std::ops::Range;
use std::path::Path;

/// Message used when no `diff_message` is configured.
pub const DEFAULT_DIFF_MESSAGE: &str = "Inconsistency found.";

/// Compares a tool's corrected output with the original file and reports one
/// [`Diagnostic`] per changed region.
#[derive(Debug, Clone)]
pub struct CorrectionExtractor {
    pub origin: String,
    pub message: String,
    pub severity: Severity,
    /// Changed regions separated by at most this many unchanged lines are
    /// reported together.
    pub merge_gap: usize,
}

impl CorrectionExtractor {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            message: DEFAULT_DIFF_MESSAGE.to_string(),
            severity: Severity::Major,
            merge_gap: 0,
        }
    }

    /// Diagnostics for every hunk between `original` and `corrected`, top to
    /// bottom. Line endings are significant.
    pub fn extract(&self, file: &Path, original: &str, corrected: &str) -> Vec<Diagnostic> {
        let old: Vec<&str> = original.split_inclusive('\n').collect();
        let new: Vec<&str> = corrected.split_inclusive('\n').collect();
        self.extract_lines(file, &old, &new)
    }

    /// Same as [`extract`](Self::extract) on pre-split lines.
    pub fn extract_lines(&self, file: &Path, old: &[&str], new: &[&str]) -> Vec<Diagnostic> {
        let ops = similar::capture_diff_slices(Algorithm::Myers, old, new);
        group_hunks(&ops, self.merge_gap)
            .into_iter()
            .map(|hunk| {
                let replacements: Vec<LineReplacement> = hunk
                    .iter()
                    .filter(|op| op.tag() != DiffTag::Equal)
                    .map(|op| LineReplacement {
                        old_start: op.old_range().start + 1,
                        old_len: op.old_range().len(),
                        new_lines: new[op.new_range()].iter().map(|l| l.to_string()).collect(),
                    })
                    .collect();
                let (start, end) = hunk_lines(&old_span(hunk));
                Diagnostic::new(
                    self.origin.as_str(),
                    self.message.as_str(),
                    self.severity,
                    Location::lines(file, start, end),
                )
                .with_patch(Patch::new(replacements))
            })
            .collect()
    }
}

/// Split diff ops into hunks, each starting and ending with a change.
///
/// Unchanged runs no longer than `gap` stay inside the surrounding hunk.
fn group_hunks(ops: &[DiffOp], gap: usize) -> Vec<&[DiffOp]> {
    let mut hunks = Vec::new();
    // index of the first change in the open hunk, and of its last change
    let mut open: Option<(usize, usize)> = None;

    for (i, op) in ops.iter().enumerate() {
        if op.tag() == DiffTag::Equal {
            if let Some((start, last)) = open {
                if op.old_range().len() > gap {
                    hunks.push(&ops[start..=last]);
                    open = None;
                }
            }
            continue;
        }
        open = Some(match open {
            Some((start, _)) => (start, i),
            None => (i, i),
        });
    }
    if let Some((start, last)) = open {
        hunks.push(&ops[start..=last]);
    }
    hunks
}

fn old_span(hunk: &[DiffOp]) -> Range<usize> {
    let start = hunk.first().map_or(0, |op| op.old_range().start);
    let end = hunk.last().map_or(start, |op| op.old_range().end);
    start..end
}

/// 1-based inclusive line range in the original file for a 0-based span.
///
/// An insertion covers no original line and is attached to the line it
/// follows, or to the first line when inserted at the top.
fn hunk_lines(span: &Range<usize>) -> (usize, usize) {
    if span.is_empty() {
        let line = span.start.max(1);
        (line, line)
    } else {
        (span.start + 1, span.end)
    }
}
