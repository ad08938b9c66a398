//! Strategies for turning raw tool output into diagnostics.
//!
//! - [`PatternExtractor`]: the tool prints findings, a regex with named groups
//!   picks them out.
//! - [`CorrectionExtractor`]: the tool prints the corrected file, a line diff
//!   against the original yields one diagnostic per changed region.

mod correction;
mod pattern;

pub use correction::{CorrectionExtractor, DEFAULT_DIFF_MESSAGE};
pub use pattern::{PatternDiagnostics, PatternExtractor};

use crate::{Diagnostic, ExtractionError};
use std::path::PathBuf;
use std::sync::Arc;

/// The extraction strategy of an adapter, fixed when it is built.
#[derive(Debug, Clone)]
pub enum OutputStrategy {
    Pattern(Arc<PatternExtractor>),
    Correction(CorrectionExtractor),
}

impl OutputStrategy {
    /// Extract diagnostics for `file` from the tool's `output`.
    ///
    /// `original` is the file content given to the tool; only the correction
    /// strategy looks at it.
    pub fn extract(&self, output: String, file: PathBuf, original: &str) -> Diagnostics {
        match self {
            Self::Pattern(extractor) => Diagnostics {
                inner: Inner::Pattern(Arc::clone(extractor).extract(output, file)),
            },
            Self::Correction(extractor) => Diagnostics {
                inner: Inner::Correction(extractor.extract(&file, original, &output).into_iter()),
            },
        }
    }
}

/// Diagnostics of one tool invocation.
///
/// Finite and single-pass. Only the pattern strategy produces `Err` items.
#[derive(Debug)]
pub struct Diagnostics {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Pattern(PatternDiagnostics),
    Correction(std::vec::IntoIter<Diagnostic>),
}

impl Iterator for Diagnostics {
    type Item = Result<Diagnostic, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Pattern(iter) => iter.next(),
            Inner::Correction(iter) => iter.next().map(Ok),
        }
    }
}
