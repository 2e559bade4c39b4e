//! Handler for the `install` command.

use anyhow::Context;
use std::env;

use shcheck_lib::config::Config;
use shcheck_lib::exit_codes::SUCCESS;
use shcheck_lib::executor::ProcessExecutor;
use shcheck_lib::installer::{maybe_install, supported_installers};

/// Install shellcheck with the given installer, or the one configured in
/// `.shcheck.toml` when none is given.
pub fn handle_install(installer: Option<&str>, list: bool) -> anyhow::Result<i32> {
    if list {
        println!("Supported installers:");
        for name in supported_installers() {
            println!("  {name}");
        }
        return Ok(SUCCESS);
    }

    let working_dir = env::current_dir().context("Failed to determine the current directory")?;
    let installer = match installer {
        Some(name) => name.to_string(),
        None => {
            Config::load(None, &working_dir)
                .context("Failed to load configuration")?
                .installer
        }
    };
    if installer.is_empty() {
        println!("No installer configured; nothing to do");
        return Ok(SUCCESS);
    }

    maybe_install(&installer, &ProcessExecutor::default(), &working_dir)?;
    println!("Installed shellcheck with {installer}");
    Ok(SUCCESS)
}
