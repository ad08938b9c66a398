//! The per-tool handler contract.

use crate::HandlerError;
use std::path::Path;

/// Extra settings forwarded untouched from the caller of [`Linter::run`](crate::Linter::run)
/// to the handler.
pub type Settings = toml::Table;

/// Tool-specific knowledge plugged into a [`Linter`](crate::Linter).
///
/// A handler only decides *what* to pass to the tool. Spawning, config file
/// lifetime and output parsing are done by the adapter.
pub trait LinterHandler: Send + Sync {
    /// Build the arguments passed to the executable (the executable itself is
    /// prepended by the adapter).
    ///
    /// `config_file` is the path of the file materialized from
    /// [`generate_config`](Self::generate_config), if any.
    fn create_arguments(
        &self,
        filename: &Path,
        content: &str,
        config_file: Option<&Path>,
        settings: &Settings,
    ) -> Result<Vec<String>, HandlerError>;

    /// Content of a configuration file to write before the tool runs.
    ///
    /// Returning `None` (the default) means no file is created.
    fn generate_config(
        &self,
        _filename: &Path,
        _content: &str,
        _settings: &Settings,
    ) -> Result<Option<String>, HandlerError> {
        Ok(None)
    }
}

impl<H: LinterHandler + ?Sized> LinterHandler for Box<H> {
    fn create_arguments(
        &self,
        filename: &Path,
        content: &str,
        config_file: Option<&Path>,
        settings: &Settings,
    ) -> Result<Vec<String>, HandlerError> {
        (**self).create_arguments(filename, content, config_file, settings)
    }

    fn generate_config(
        &self,
        filename: &Path,
        content: &str,
        settings: &Settings,
    ) -> Result<Option<String>, HandlerError> {
        (**self).generate_config(filename, content, settings)
    }
}
