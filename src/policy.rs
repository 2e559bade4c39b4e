//! Pass/warn/fail decision for a finished run.

use std::path::Path;
use url::Url;

use crate::config::ReportsConfig;
use crate::summary::ReportSummary;

pub const VIOLATIONS_PREAMBLE: &str = "Shellcheck violations were found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// Violations were found but failures are ignored
    Warn(String),
    /// Violations were found; the build should stop
    Fail(String),
}

impl Outcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Pass => None,
            Outcome::Warn(m) | Outcome::Fail(m) => Some(m),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Fail(_))
    }
}

/// `file://` URL for `path`, or the plain path when it cannot be expressed as one
pub fn clickable_path(path: &Path) -> String {
    match Url::from_file_path(path) {
        Ok(url) => url.to_string(),
        Err(()) => path.display().to_string(),
    }
}

/// The most detailed enabled report: HTML, then XML.
fn report_pointer(reports: &ReportsConfig) -> Option<&Path> {
    if reports.html.enabled {
        Some(&reports.html.destination)
    } else if reports.xml.enabled {
        Some(&reports.xml.destination)
    } else {
        None
    }
}

pub fn violation_message(summary: &ReportSummary, reports: &ReportsConfig) -> String {
    let pointer = report_pointer(reports)
        .map(|p| format!(" See the report at: {}", clickable_path(p)))
        .unwrap_or_default();
    format!("{VIOLATIONS_PREAMBLE}{pointer}\n{summary}")
}

pub fn decide(summary: &ReportSummary, ignore_failures: bool, reports: &ReportsConfig) -> Outcome {
    if !summary.has_violations() {
        return Outcome::Pass;
    }
    let message = violation_message(summary, reports);
    if ignore_failures {
        Outcome::Warn(message)
    } else {
        Outcome::Fail(message)
    }
}
