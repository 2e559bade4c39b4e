//! Command execution for shellcheck, the container runtime and installers.
//!
//! Commands run with an explicitly constructed environment: nothing from the
//! caller's environment leaks into the child except the handful of variables
//! needed to locate binaries and the container daemon. Standard output and
//! standard error share one pipe, so the captured text keeps the order in
//! which the tool wrote it.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Environment variables forwarded to every child process.
pub const FORWARDED_ENV: &[&str] = &["PATH", "HOME", "DOCKER_HOST", "DOCKER_CONFIG", "DOCKER_CERT_PATH"];

/// Error during command execution.
///
/// A non-zero exit status is not an error; callers inspect the captured
/// output to decide whether a run succeeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// The command line had no program.
    #[error("Empty command")]
    EmptyCommand,
    /// The program could not be started (not found, permission denied, ...).
    #[error("Failed to launch '{program}': {message}")]
    LaunchFailed { program: String, message: String },
    /// The program did not exit within the configured timeout.
    #[error("'{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },
    /// I/O error while collecting output.
    #[error("I/O error while running '{program}': {message}")]
    IoError { program: String, message: String },
}

/// Runs a command line to completion and returns its combined output.
pub trait CommandExecutor {
    fn execute(&self, command: &[String], working_dir: &Path) -> Result<String, ExecutorError>;
}

/// Executor backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    /// Wall-clock budget per command. `None` waits forever.
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, command: &[String], working_dir: &Path) -> Result<String, ExecutorError> {
        let Some(program) = command.first() else {
            return Err(ExecutorError::EmptyCommand);
        };

        log::debug!("Running {:?} in {}", command, working_dir.display());

        let io_error = |e: std::io::Error| ExecutorError::IoError {
            program: program.clone(),
            message: e.to_string(),
        };

        let (reader, writer) = std::io::pipe().map_err(io_error)?;

        // The Command owns copies of the write end; it must be dropped right
        // after spawning or the reader never sees EOF.
        let mut child = {
            let mut cmd = Command::new(program);
            cmd.args(&command[1..])
                .current_dir(working_dir)
                .env_clear()
                .stdin(Stdio::null())
                .stdout(writer.try_clone().map_err(io_error)?)
                .stderr(writer);
            for key in FORWARDED_ENV {
                if let Some(value) = std::env::var_os(key) {
                    cmd.env(key, value);
                }
            }
            cmd.spawn().map_err(|e| ExecutorError::LaunchFailed {
                program: program.clone(),
                message: e.to_string(),
            })?
        };

        let output_handle = thread::spawn(move || read_pipe_to_string(reader));

        match self.timeout {
            None => {
                child.wait().map_err(io_error)?;
            }
            Some(timeout) => {
                let start = Instant::now();
                loop {
                    if child.try_wait().map_err(io_error)?.is_some() {
                        break;
                    }
                    if start.elapsed() >= timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        // Grandchildren may still hold the pipe open, so the
                        // reader thread is left to finish on its own.
                        drop(output_handle);
                        return Err(ExecutorError::Timeout {
                            program: program.clone(),
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                    thread::sleep(Duration::from_millis(10));
                }
            }
        }

        let output = match output_handle.join() {
            Ok(res) => res.map_err(io_error)?,
            Err(_) => {
                return Err(ExecutorError::IoError {
                    program: program.clone(),
                    message: "Output reader thread panicked".to_string(),
                });
            }
        };

        Ok(output.trim_end().to_string())
    }
}

fn read_pipe_to_string<R: Read>(mut pipe: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}
