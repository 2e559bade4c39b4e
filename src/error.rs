//! Crate-level error type.
//!
//! Every fatal condition of a run ends up here. Violations found by
//! shellcheck are not errors; they are reported through
//! [`crate::policy::Outcome`].

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::executor::ExecutorError;
use crate::installer::InstallerError;

pub type Result<T> = std::result::Result<T, ShellcheckError>;

#[derive(Debug, thiserror::Error)]
pub enum ShellcheckError {
    /// Checkstyle output did not contain an XML declaration. The tool's own
    /// text is carried verbatim.
    #[error("Shellcheck did not produce checkstyle output:\n{output}")]
    ToolOutput { output: String },

    /// Checkstyle output had a declaration but was not a valid document
    #[error("Failed to parse shellcheck checkstyle output: {message}")]
    MalformedReport { message: String },

    /// The external command could not be started
    #[error("Failed to launch '{program}': {message}")]
    ProcessLaunch { program: String, message: String },

    /// The external command outlived its time budget
    #[error("'{program}' timed out after {timeout_ms}ms")]
    ProcessTimeout { program: String, timeout_ms: u64 },

    /// Collecting output or waiting on a running command failed
    #[error("I/O error while running '{program}': {message}")]
    ProcessIo { program: String, message: String },

    /// The HTML report could not be produced
    #[error("Failed to render HTML report {path}: {message}")]
    ReportRender { path: PathBuf, message: String },

    #[error(transparent)]
    InstallerUnsupported(#[from] InstallerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
}

impl ShellcheckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

impl From<ExecutorError> for ShellcheckError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::LaunchFailed { program, message } => Self::ProcessLaunch { program, message },
            ExecutorError::Timeout { program, timeout_ms } => Self::ProcessTimeout { program, timeout_ms },
            ExecutorError::EmptyCommand => Self::ProcessLaunch {
                program: String::new(),
                message: "Empty command".to_string(),
            },
            ExecutorError::IoError { program, message } => Self::ProcessIo { program, message },
        }
    }
}
