//! One complete shellcheck run: install, resolve, invoke, merge, render, decide.

use std::path::Path;

use crate::checkstyle::{CheckstyleMerger, RawInvocationResult};
use crate::config::{Config, ExecutionConfig};
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::installer::maybe_install;
use crate::planner::{ToolFormat, plan};
use crate::policy::{Outcome, decide};
use crate::render::{RenderedReports, render};
use crate::sources::{Resolution, ResolvedSources, resolve};
use crate::summary::{ReportSummary, summarize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// No directory held a script and no file was named
    NothingToCheck,
    /// shellcheck ran but reported no files at all
    NothingFound,
    Checked { summary: ReportSummary, outcome: Outcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    /// shellcheck's tty output, when it was requested
    pub tty_output: Option<String>,
    pub rendered: RenderedReports,
}

impl RunReport {
    fn without_reports(status: RunStatus) -> Self {
        Self {
            status,
            tty_output: None,
            rendered: RenderedReports::default(),
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.status {
            RunStatus::Checked { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

fn run_checkstyle(
    resolved: &ResolvedSources,
    exec: &ExecutionConfig,
    executor: &dyn CommandExecutor,
) -> Result<CheckstyleMerger> {
    let mut merger = CheckstyleMerger::new();
    for invocation in plan(resolved, exec, ToolFormat::Checkstyle) {
        log::debug!("Checking {}", invocation.target.path().display());
        let text = executor.execute(&invocation.command, &exec.working_dir)?;
        merger.push(&RawInvocationResult {
            format: invocation.format,
            text,
        })?;
    }
    Ok(merger)
}

fn run_tty(resolved: &ResolvedSources, exec: &ExecutionConfig, executor: &dyn CommandExecutor) -> Result<String> {
    let mut outputs = Vec::new();
    for invocation in plan(resolved, exec, ToolFormat::Tty) {
        let text = executor.execute(&invocation.command, &exec.working_dir)?;
        if !text.is_empty() {
            outputs.push(text);
        }
    }
    Ok(outputs.join("\n"))
}

/// Run shellcheck as configured, relative to `working_dir`.
///
/// Fatal problems are returned as errors; violations are reported through
/// [`RunStatus::Checked`]. Reports are only written after every checkstyle
/// invocation has been merged successfully.
pub fn run(config: &Config, working_dir: &Path, executor: &dyn CommandExecutor) -> Result<RunReport> {
    maybe_install(&config.installer, executor, working_dir)?;

    let exec = config.execution(working_dir);
    let reports = config.reports.rooted_at(working_dir);

    let resolved = match resolve(&config.source_set(), working_dir) {
        Resolution::NothingToCheck => {
            log::info!("No shell scripts to check");
            return Ok(RunReport::without_reports(RunStatus::NothingToCheck));
        }
        Resolution::Targets(resolved) => resolved,
    };
    log::info!(
        "Running shellcheck on {} source directories and {} source files",
        resolved.batched_dirs.len(),
        resolved.individual_files.len()
    );

    let merger = run_checkstyle(&resolved, &exec, executor)?;
    if merger.is_empty() {
        log::info!("Shellcheck reported no files");
        return Ok(RunReport::without_reports(RunStatus::NothingFound));
    }
    let report = merger.finish();

    let tty_output = if config.show_violations || reports.txt.enabled {
        Some(run_tty(&resolved, &exec, executor)?)
    } else {
        None
    };

    let rendered = render(&report, tty_output.as_deref(), &reports, &std::env::temp_dir())?;

    let summary = summarize(&report);
    let outcome = decide(&summary, config.ignore_failures, &reports);
    log::debug!("Summary: {summary:?}, outcome: {outcome:?}");

    Ok(RunReport {
        status: RunStatus::Checked { summary, outcome },
        tty_output,
        rendered,
    })
}
