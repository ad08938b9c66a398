//! Regex-based extraction of diagnostics from tool output.

use crate::{ConfigurationError, Diagnostic, ExtractionError, Location, Severity};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Turns every match of a pattern with named groups into a [`Diagnostic`].
///
/// Recognized groups: `message` and `severity` (required), `line`, `column`,
/// `end_line`, `end_column` and `origin` (optional).
#[derive(Debug)]
pub struct PatternExtractor {
    regex: Regex,
    /// Uppercased labels. `None` selects the default info/warning/error table.
    severity_map: Option<HashMap<String, Severity>>,
    default_origin: String,
}

impl PatternExtractor {
    pub fn new(
        pattern: &str,
        severity_map: Option<HashMap<String, Severity>>,
        default_origin: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let regex = Regex::new(pattern)?;
        for required in ["message", "severity"] {
            if !regex.capture_names().flatten().any(|name| name == required) {
                return Err(ConfigurationError::MissingCaptureGroup(required));
            }
        }

        let severity_map = severity_map.map(|map| {
            map.into_iter()
                .map(|(label, severity)| (label.to_uppercase(), severity))
                .collect()
        });

        Ok(Self {
            regex,
            severity_map,
            default_origin: default_origin.into(),
        })
    }

    /// Lazily extract diagnostics from `output`, in order of appearance.
    pub fn extract(self: Arc<Self>, output: String, file: PathBuf) -> PatternDiagnostics {
        PatternDiagnostics {
            extractor: self,
            output,
            file,
            pos: 0,
        }
    }

    fn severity(&self, label: &str) -> Option<Severity> {
        match &self.severity_map {
            Some(map) => map.get(&label.to_uppercase()).copied(),
            None => Severity::from_label(label),
        }
    }

    fn diagnostic(&self, caps: &Captures<'_>, file: &Path) -> Result<Diagnostic, ExtractionError> {
        let snippet = caps.get(0).map_or("", |m| m.as_str());
        let required = |group: &'static str| {
            caps.name(group)
                .map(|m| m.as_str())
                .ok_or_else(|| ExtractionError::MissingGroup {
                    group,
                    snippet: snippet.to_string(),
                })
        };
        let number = |group: &'static str| -> Result<Option<usize>, ExtractionError> {
            caps.name(group)
                .map(|m| {
                    m.as_str()
                        .trim()
                        .parse()
                        .map_err(|_| ExtractionError::InvalidNumber {
                            group,
                            value: m.as_str().to_string(),
                            snippet: snippet.to_string(),
                        })
                })
                .transpose()
        };

        let message = required("message")?;
        let label = required("severity")?;
        let severity = self
            .severity(label)
            .ok_or_else(|| ExtractionError::UnknownSeverity {
                severity: label.to_string(),
                snippet: snippet.to_string(),
            })?;

        let location = Location {
            file: file.to_path_buf(),
            line: number("line")?,
            column: number("column")?,
            end_line: number("end_line")?,
            end_column: number("end_column")?,
        };
        let origin = caps
            .name("origin")
            .map_or(self.default_origin.as_str(), |m| m.as_str());

        Ok(Diagnostic::new(origin, message, severity, location))
    }
}

/// Iterator over the diagnostics found by a [`PatternExtractor`].
///
/// Finite and single-pass. A match that cannot be converted yields an `Err`;
/// scanning continues with the next match.
#[derive(Debug)]
pub struct PatternDiagnostics {
    extractor: Arc<PatternExtractor>,
    output: String,
    file: PathBuf,
    /// Byte offset where the next search starts.
    pos: usize,
}

impl Iterator for PatternDiagnostics {
    type Item = Result<Diagnostic, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.output.len() {
            return None;
        }
        let Some(caps) = self.extractor.regex.captures_at(&self.output, self.pos) else {
            self.pos = self.output.len() + 1;
            return None;
        };
        let whole = caps.get(0)?;

        self.pos = if whole.is_empty() {
            // step over one character so empty matches cannot repeat forever
            whole.end()
                + self.output[whole.end()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8)
        } else {
            whole.end()
        };

        Some(self.extractor.diagnostic(&caps, &self.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE_PATTERN: &str = r"(?P<line>\d+):(?P<column>\d+)-(?P<end_line>\d+):(?P<end_column>\d+)-(?P<message>.*) \((?P<severity>.*)\) -> ORIGIN=(?P<origin>.*)";

    fn extract(
        extractor: PatternExtractor,
        output: &str,
    ) -> Vec<Result<Diagnostic, ExtractionError>> {
        Arc::new(extractor)
            .extract(output.to_string(), PathBuf::from("some-file.xtx"))
            .collect()
    }

    #[test]
    fn test_process_output_issues() {
        let output = "12:4-14:0-Serious issue (error) -> ORIGIN=X\n\
                      0:0-0:1-This is a warning (warning) -> ORIGIN=Y\n\
                      813:77-1024:32-Just a note (info) -> ORIGIN=Z\n";
        let extractor = PatternExtractor::new(ISSUE_PATTERN, None, "tool").unwrap();
        let results: Vec<Diagnostic> = extract(extractor, output)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            results,
            vec![
                Diagnostic::new(
                    "X",
                    "Serious issue",
                    Severity::Major,
                    Location::new("some-file.xtx", 12, 4).with_end(14, 0),
                ),
                Diagnostic::new(
                    "Y",
                    "This is a warning",
                    Severity::Normal,
                    Location::new("some-file.xtx", 0, 0).with_end(0, 1),
                ),
                Diagnostic::new(
                    "Z",
                    "Just a note",
                    Severity::Minor,
                    Location::new("some-file.xtx", 813, 77).with_end(1024, 32),
                ),
            ]
        );
    }

    #[test]
    fn test_order_of_appearance_not_position() {
        let output = "9:1-9:2-later (error) -> ORIGIN=A\n1:1-1:2-earlier (error) -> ORIGIN=B\n";
        let extractor = PatternExtractor::new(ISSUE_PATTERN, None, "tool").unwrap();
        let origins: Vec<String> = extract(extractor, output)
            .into_iter()
            .map(|d| d.unwrap().origin)
            .collect();
        assert_eq!(origins, ["A", "B"]);
    }

    #[test]
    fn test_optional_groups_default() {
        let extractor =
            PatternExtractor::new(r"(?P<severity>\w+): (?P<message>.*)", None, "mytool").unwrap();
        let results = extract(extractor, "warning: something odd\n");
        let diag = results[0].clone().unwrap();
        assert_eq!(diag.origin, "mytool");
        assert_eq!(diag.location, Location::file("some-file.xtx"));
        assert_eq!(diag.severity, Severity::Normal);
    }

    #[test]
    fn test_custom_severity_map_is_case_insensitive() {
        let map = HashMap::from([("major".to_string(), Severity::Major)]);
        let extractor = PatternExtractor::new(
            r"L(?P<line>\d+): (?P<message>.*) \| (?P<severity>.+) SEVERITY",
            Some(map),
            "tool",
        )
        .unwrap();
        let results = extract(extractor, "L3: Invalid char ('0') | MAJOR SEVERITY\n");
        let diag = results[0].clone().unwrap();
        assert_eq!(diag.severity, Severity::Major);
        assert_eq!(diag.location.line, Some(3));
    }

    #[test]
    fn test_custom_map_replaces_default() {
        let map = HashMap::from([("MAJOR".to_string(), Severity::Major)]);
        let extractor = PatternExtractor::new(
            r"(?P<severity>\w+): (?P<message>.*)",
            Some(map),
            "tool",
        )
        .unwrap();
        let results = extract(extractor, "error: boom\n");
        assert!(matches!(
            &results[0],
            Err(ExtractionError::UnknownSeverity { severity, .. }) if severity == "error"
        ));
    }

    #[test]
    fn test_unknown_severity_does_not_stop_scan() {
        let extractor = PatternExtractor::new(ISSUE_PATTERN, None, "tool").unwrap();
        let output = "1:1-1:2-odd (fatal) -> ORIGIN=A\n2:1-2:2-fine (info) -> ORIGIN=B\n";
        let results = extract(extractor, output);
        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(ExtractionError::UnknownSeverity { severity, snippet }) => {
                assert_eq!(severity, "fatal");
                assert_eq!(snippet, "1:1-1:2-odd (fatal) -> ORIGIN=A");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(results[1].as_ref().unwrap().origin, "B");
    }

    #[test]
    fn test_unparsable_number() {
        let extractor = PatternExtractor::new(
            r"(?P<line>\S+) (?P<severity>\w+) (?P<message>.*)",
            None,
            "tool",
        )
        .unwrap();
        let results = extract(extractor, "x12 error broken\n");
        assert!(matches!(
            &results[0],
            Err(ExtractionError::InvalidNumber { group: "line", value, .. }) if value == "x12"
        ));
    }

    #[test]
    fn test_missing_required_group_rejected() {
        assert!(matches!(
            PatternExtractor::new(r"(?P<message>.*)", None, "tool"),
            Err(ConfigurationError::MissingCaptureGroup("severity"))
        ));
        assert!(matches!(
            PatternExtractor::new(r"(?P<severity>.*)", None, "tool"),
            Err(ConfigurationError::MissingCaptureGroup("message"))
        ));
        assert!(matches!(
            PatternExtractor::new(r"(?P<message>", None, "tool"),
            Err(ConfigurationError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_empty_matches_terminate() {
        let extractor =
            PatternExtractor::new(r"(?P<severity>x?)(?P<message>y?)", None, "tool").unwrap();
        // every match is empty or has an unknown severity; the scan must still end
        assert_eq!(extract(extractor, "ab").len(), 3);
    }

    #[test]
    fn test_no_matches() {
        let extractor = PatternExtractor::new(ISSUE_PATTERN, None, "tool").unwrap();
        assert!(extract(extractor, "all good\n").is_empty());
    }
}
