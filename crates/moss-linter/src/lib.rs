//! Wrap arbitrary command-line linters and formatters as diagnostic producers.
//!
//! A [`Linter`] combines validated [`LinterOptions`] with a [`LinterHandler`]
//! that knows how to call one particular tool. For each file the adapter:
//!
//! 1. optionally writes a config file generated by the handler,
//! 2. asks the handler for the command-line arguments,
//! 3. runs the tool, passing the file on stdin if configured,
//! 4. turns the chosen output stream into [`Diagnostic`]s, either by matching
//!    an output pattern or by diffing the corrected file the tool printed.
//!
//! # Example
//!
//! ```ignore
//! use rhizome_moss_linter::{
//!     HandlerError, Linter, LinterHandler, LinterOptions, Settings, Severity,
//! };
//! use std::path::Path;
//!
//! struct Pylint;
//!
//! impl LinterHandler for Pylint {
//!     fn create_arguments(
//!         &self,
//!         filename: &Path,
//!         _content: &str,
//!         _config_file: Option<&Path>,
//!         _settings: &Settings,
//!     ) -> Result<Vec<String>, HandlerError> {
//!         Ok(vec![
//!             "--msg-template={line}:{column}: {category}: {msg}".into(),
//!             filename.display().to_string(),
//!         ])
//!     }
//! }
//!
//! let linter = Linter::new(
//!     LinterOptions::new("pylint")
//!         .output_pattern(r"(?P<line>\d+):(?P<column>\d+): (?P<severity>\w+): (?P<message>.*)")
//!         .severity_map([("convention", Severity::Minor), ("error", Severity::Major)]),
//!     Pylint,
//! )?;
//!
//! linter.check_prerequisites()?;
//! for diagnostic in linter.run(path, &content, &Settings::new())? {
//!     println!("{:?}", diagnostic?);
//! }
//! ```

mod config_file;
mod diagnostic;
mod error;
pub mod extract;
mod handler;
mod linter;
mod options;
pub mod process;

pub use config_file::ConfigFile;
pub use diagnostic::{Diagnostic, LineReplacement, Location, Patch, Severity};
pub use error::{ConfigurationError, ExtractionError, HandlerError, LinterError, PrerequisiteUnmet};
pub use extract::Diagnostics;
pub use handler::{LinterHandler, Settings};
pub use linter::Linter;
pub use options::{KNOWN_OPTIONS, LinterConfig, LinterOptions, OutputStream};
