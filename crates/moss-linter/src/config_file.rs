//! Temporary configuration files generated by handlers.

use crate::{LinterError, LinterHandler, Settings};
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;

/// A generated config file that lives for one tool invocation.
///
/// The file is deleted when the guard is dropped, whichever way the
/// surrounding code exits.
#[derive(Debug)]
pub struct ConfigFile {
    path: Option<TempPath>,
}

impl ConfigFile {
    /// Ask `handler` for config content and write it verbatim to a fresh
    /// temporary file.
    ///
    /// Yields an empty guard when the handler produces no config.
    pub fn create<H: LinterHandler + ?Sized>(
        handler: &H,
        executable: &str,
        suffix: Option<&str>,
        filename: &Path,
        content: &str,
        settings: &Settings,
    ) -> Result<Self, LinterError> {
        Self::create_in(
            &std::env::temp_dir(),
            handler,
            executable,
            suffix,
            filename,
            content,
            settings,
        )
    }

    /// Like [`ConfigFile::create`], placing the file in `dir`.
    pub fn create_in<H: LinterHandler + ?Sized>(
        dir: &Path,
        handler: &H,
        executable: &str,
        suffix: Option<&str>,
        filename: &Path,
        content: &str,
        settings: &Settings,
    ) -> Result<Self, LinterError> {
        let generated = handler
            .generate_config(filename, content, settings)
            .map_err(|source| LinterError::Handler {
                executable: executable.to_string(),
                source,
            })?;

        let Some(generated) = generated else {
            return Ok(Self { path: None });
        };

        let write_error = |source| LinterError::ConfigWrite {
            executable: executable.to_string(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix("moss-linter-")
            .suffix(suffix.unwrap_or(""))
            .tempfile_in(dir)
            .map_err(write_error)?;
        // On failure `file` is dropped, which removes it.
        file.write_all(generated.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;

        let path = file.into_temp_path();
        log::debug!("{executable}: wrote config to {}", path.display());
        Ok(Self { path: Some(path) })
    }

    /// Path of the config file, if one was generated.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Delete the file now, reporting failures instead of ignoring them.
    pub fn close(self) -> std::io::Result<()> {
        match self.path {
            Some(path) => path.close(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerError;

    struct NoConfig;

    impl LinterHandler for NoConfig {
        fn create_arguments(
            &self,
            _filename: &Path,
            _content: &str,
            _config_file: Option<&Path>,
            _settings: &Settings,
        ) -> Result<Vec<String>, HandlerError> {
            Ok(vec![])
        }
    }

    struct ValueConfig;

    impl LinterHandler for ValueConfig {
        fn create_arguments(
            &self,
            _filename: &Path,
            _content: &str,
            _config_file: Option<&Path>,
            _settings: &Settings,
        ) -> Result<Vec<String>, HandlerError> {
            Ok(vec![])
        }

        fn generate_config(
            &self,
            _filename: &Path,
            _content: &str,
            settings: &Settings,
        ) -> Result<Option<String>, HandlerError> {
            let val = settings
                .get("val")
                .and_then(toml::Value::as_integer)
                .ok_or("missing `val`")?;
            Ok(Some(format!("config_value = {val}")))
        }
    }

    #[test]
    fn test_no_config() {
        let file = ConfigFile::create(
            &NoConfig,
            "tool",
            None,
            Path::new("filename"),
            "",
            &Settings::new(),
        )
        .unwrap();
        assert!(file.path().is_none());
    }

    #[test]
    fn test_config_written_and_removed() {
        let mut settings = Settings::new();
        settings.insert("val".into(), 88.into());

        let file = ConfigFile::create(
            &ValueConfig,
            "tool",
            Some(".cfg"),
            Path::new("filename"),
            "",
            &settings,
        )
        .unwrap();
        let path = file.path().unwrap().to_path_buf();
        assert!(path.is_file());
        assert!(path.to_string_lossy().ends_with(".cfg"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "config_value = 88");

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_removes_file() {
        let mut settings = Settings::new();
        settings.insert("val".into(), 1.into());

        let file = ConfigFile::create(
            &ValueConfig,
            "tool",
            None,
            Path::new("filename"),
            "",
            &settings,
        )
        .unwrap();
        let path = file.path().unwrap().to_path_buf();
        file.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_failure_leaves_no_file() {
        let mut settings = Settings::new();
        settings.insert("val".into(), 5.into());
        let dir = tempfile::tempdir().unwrap();

        let err = ConfigFile::create_in(
            &dir.path().join("missing"),
            &ValueConfig,
            "tool",
            Some(".cfg"),
            Path::new("filename"),
            "",
            &settings,
        )
        .unwrap_err();
        assert!(
            matches!(err, LinterError::ConfigWrite { ref executable, .. } if executable == "tool")
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_handler_error_propagates() {
        let err = ConfigFile::create(
            &ValueConfig,
            "tool",
            None,
            Path::new("filename"),
            "",
            &Settings::new(),
        )
        .unwrap_err();
        assert!(matches!(err, LinterError::Handler { .. }));
    }
}
