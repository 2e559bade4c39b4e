//! Handler for the `init` command.

use colored::*;
use std::path::Path;

use shcheck_lib::config::{CONFIG_FILE_NAME, create_default_config};
use shcheck_lib::exit_codes::{SUCCESS, TOOL_ERROR};

/// Write a commented default configuration file.
pub fn handle_init(path: Option<&Path>) -> i32 {
    let path = path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    match create_default_config(path) {
        Ok(()) => {
            println!("Created default configuration file: {}", path.display());
            SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", "Error".red().bold());
            TOOL_ERROR
        }
    }
}
