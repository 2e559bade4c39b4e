//! Command handlers for the shcheck CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to. Handlers return the process exit code.

pub mod check;
pub mod completions;
pub mod init;
pub mod install;
pub mod version;
