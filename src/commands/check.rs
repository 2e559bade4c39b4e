//! Handler for the `check` command.

use anyhow::Context;
use colored::*;
use std::env;

use shcheck_lib::config::Config;
use shcheck_lib::exit_codes::{SUCCESS, VIOLATIONS_FOUND};
use shcheck_lib::executor::ProcessExecutor;
use shcheck_lib::pipeline::{RunStatus, run};
use shcheck_lib::policy::Outcome;

use crate::cli_types::CheckArgs;

/// Run shellcheck and report the verdict through the exit code.
pub fn handle_check(args: &CheckArgs) -> anyhow::Result<i32> {
    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    let base = match &args.working_dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };

    let mut config = Config::load(args.config.as_deref(), &base).context("Failed to load configuration")?;
    args.apply_to(&mut config);

    // `--working-dir` is already in `base`; only the configured one is relative to it
    let working_dir = match (&args.working_dir, &config.working_dir) {
        (None, Some(dir)) => base.join(dir),
        _ => base,
    };
    let executor = ProcessExecutor::new(config.execution(&working_dir).timeout);

    let report = run(&config, &working_dir, &executor)?;

    if config.show_violations
        && let Some(output) = report.tty_output.as_deref()
        && !output.is_empty()
    {
        println!("{output}");
    }

    for path in [&report.rendered.xml, &report.rendered.html, &report.rendered.txt]
        .into_iter()
        .flatten()
    {
        println!("Report written to {}", path.display());
    }

    let code = match &report.status {
        RunStatus::NothingToCheck => {
            println!("No shell scripts to check");
            SUCCESS
        }
        RunStatus::NothingFound => {
            println!("Shellcheck reported no files");
            SUCCESS
        }
        RunStatus::Checked { outcome, .. } => match outcome {
            Outcome::Pass => {
                println!("{}", "No shellcheck violations found".green());
                SUCCESS
            }
            Outcome::Warn(message) => {
                eprintln!("{}: {message}", "Warning".yellow().bold());
                SUCCESS
            }
            Outcome::Fail(message) => {
                eprintln!("{}: {message}", "Error".red().bold());
                VIOLATIONS_FOUND
            }
        },
    };
    Ok(code)
}
