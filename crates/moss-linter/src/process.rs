//! Spawning tools and locating executables.

use crate::LinterError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Captured result of a finished tool.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit status, informational only. Linters commonly exit non-zero when
    /// they report findings.
    pub status: ExitStatus,
}

/// Run `argv[0]` with the remaining tokens as arguments and wait for it.
///
/// When `stdin` is given it is written in full and the pipe closed; otherwise
/// the tool gets an empty stdin. Both output streams are drained completely and
/// decoded as UTF-8 with invalid sequences replaced.
pub fn run_process<S: AsRef<str>>(
    argv: &[S],
    stdin: Option<&str>,
) -> Result<ProcessOutput, LinterError> {
    let (program, args) = argv.split_first().ok_or(LinterError::EmptyCommand)?;
    let program: &str = program.as_ref();
    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    log::debug!("running {program} {args:?}");

    let mut child = Command::new(program)
        .args(&args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| LinterError::ProcessStart {
            executable: program.to_string(),
            source,
        })?;

    // Feed stdin from a separate thread so a tool that writes a lot before
    // reading all of its input cannot fill the output pipes and stall.
    let output = std::thread::scope(|scope| {
        if let (Some(mut pipe), Some(text)) = (child.stdin.take(), stdin) {
            scope.spawn(move || {
                if let Err(e) = pipe.write_all(text.as_bytes()) {
                    log::warn!("{program}: failed to write stdin: {e}");
                }
                // pipe dropped here, closing the tool's stdin
            });
        }
        child.wait_with_output()
    })
    .map_err(|source| LinterError::ProcessIo {
        executable: program.to_string(),
        source,
    })?;

    log::debug!("{program} exited with {}", output.status);

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    })
}

/// Locate `executable`.
///
/// Names containing a path separator are checked directly; bare names are
/// looked up on `PATH`.
pub fn resolve_executable(executable: &str) -> Option<PathBuf> {
    if executable.is_empty() {
        return None;
    }
    if is_path_like(executable) {
        let path = Path::new(executable);
        return is_executable(path).then(|| path.to_path_buf());
    }
    which::which(executable).ok()
}

fn is_path_like(executable: &str) -> bool {
    executable.contains('/') || executable.contains(std::path::MAIN_SEPARATOR)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
