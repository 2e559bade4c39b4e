//! Run shellcheck over a set of directories and files and turn its output into
//! checkstyle XML, HTML and text reports, with a pass/warn/fail verdict for
//! the surrounding build.
//!
//! The entry point is [`pipeline::run`]:
//!
//! ```text
//! sources ─▶ resolve ─▶ plan ─▶ execute ─▶ merge ─▶ render
//!                                             └───▶ summarize ─▶ decide
//! ```

pub mod checkstyle;
pub mod config;
pub mod error;
pub mod executor;
pub mod exit_codes;
pub mod installer;
pub mod pipeline;
pub mod planner;
pub mod policy;
pub mod render;
pub mod sources;
pub mod summary;

pub use checkstyle::{CheckstyleReport, RawInvocationResult, merge};
pub use config::{Config, ExecutionConfig, Severity};
pub use error::{Result, ShellcheckError};
pub use executor::{CommandExecutor, ExecutorError, ProcessExecutor};
pub use pipeline::{RunReport, RunStatus, run};
pub use policy::Outcome;
pub use sources::SourceSet;
pub use summary::{ReportSummary, summarize};
