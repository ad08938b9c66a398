//! The adapter tying options, handler, process and extraction together.

use crate::config_file::ConfigFile;
use crate::extract::{Diagnostics, OutputStrategy};
use crate::process::{self, ProcessOutput};
use crate::{
    ConfigurationError, LinterConfig, LinterError, LinterHandler, LinterOptions,
    PrerequisiteUnmet, Settings,
};
use std::path::Path;
use std::sync::Arc;

/// A command-line tool wrapped into a diagnostic producer.
///
/// The configuration is validated once in [`Linter::new`] and never changes
/// afterwards, so a `Linter` can be shared between threads and run on many
/// files concurrently.
#[derive(Debug)]
pub struct Linter<H> {
    config: Arc<LinterConfig>,
    handler: H,
}

impl<H: Clone> Clone for Linter<H> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            handler: self.handler.clone(),
        }
    }
}

impl<H: LinterHandler> Linter<H> {
    /// Validate `options` and wrap `handler`.
    pub fn new(options: LinterOptions, handler: H) -> Result<Self, ConfigurationError> {
        Ok(Self {
            config: Arc::new(options.compile()?),
            handler,
        })
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn executable(&self) -> &str {
        &self.config.executable
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Check that the executable can be run on this host.
    ///
    /// Never fails in any other way: the error carries a human-readable reason
    /// so callers can skip the tool and report it.
    pub fn check_prerequisites(&self) -> Result<(), PrerequisiteUnmet> {
        let executable = self.executable();
        if process::resolve_executable(executable).is_none() {
            return Err(PrerequisiteUnmet::new(format!(
                "'{executable}' is not installed."
            )));
        }

        if let Some(command) = &self.config.prerequisite_check_command {
            let passed = process::run_process(command, None)
                .map(|output| output.status.success())
                .unwrap_or(false);
            if !passed {
                return Err(PrerequisiteUnmet::new(
                    self.config.prerequisite_check_fail_message.as_str(),
                ));
            }
        }
        Ok(())
    }

    /// Run the executable with `args` appended.
    pub fn execute_command<S: AsRef<str>>(
        &self,
        args: &[S],
        stdin: Option<&str>,
    ) -> Result<ProcessOutput, LinterError> {
        let argv: Vec<&str> = std::iter::once(self.executable())
            .chain(args.iter().map(|arg| arg.as_ref()))
            .collect();
        process::run_process(&argv, stdin)
    }

    /// Lint one file.
    ///
    /// The generated config file, if any, is removed before this returns.
    /// Diagnostics are extracted lazily as the result is iterated.
    pub fn run(
        &self,
        filename: &Path,
        content: &str,
        settings: &Settings,
    ) -> Result<Diagnostics, LinterError> {
        let config_file = ConfigFile::create(
            &self.handler,
            self.executable(),
            self.config.config_suffix.as_deref(),
            filename,
            content,
            settings,
        )?;
        let args = self
            .handler
            .create_arguments(filename, content, config_file.path(), settings)
            .map_err(|source| LinterError::Handler {
                executable: self.executable().to_string(),
                source,
            });
        let output = args.and_then(|args| {
            let stdin = self.config.use_stdin.then_some(content);
            self.execute_command(&args, stdin)
        });
        if let Err(e) = config_file.close() {
            log::warn!("{}: failed to remove config file: {e}", self.executable());
        }

        Ok(self.process_output(output?, filename, content))
    }

    fn process_output(
        &self,
        output: ProcessOutput,
        filename: &Path,
        content: &str,
    ) -> Diagnostics {
        let text = self.config.output_stream.select(output.stdout, output.stderr);
        self.strategy().extract(text, filename.to_path_buf(), content)
    }

    fn strategy(&self) -> &OutputStrategy {
        &self.config.strategy
    }
}
