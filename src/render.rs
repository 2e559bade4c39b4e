//! Report rendering: checkstyle XML, HTML derived from it, and plain text.
//!
//! HTML is always produced from the XML file on disk, never from the
//! in-memory report, so a custom template sees exactly what the XML report
//! contains. When only HTML was requested the XML goes to a scratch file that
//! is removed once the HTML exists.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::checkstyle::{CheckstyleError, CheckstyleReport};
use crate::config::ReportsConfig;
use crate::error::{Result, ShellcheckError};
use crate::summary::summarize;

/// Layout used when no custom template is configured
pub const DEFAULT_HTML_TEMPLATE: &str = include_str!("templates/report.html.tera");

const TEMPLATE_NAME: &str = "shellcheck.html";

#[derive(Debug, Serialize)]
struct SeverityCount<'a> {
    severity: &'a str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ErrorView<'a> {
    severity: &'a str,
    line: Option<u32>,
    column: Option<u32>,
    message: &'a str,
    source: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FileView<'a> {
    name: &'a str,
    errors: Vec<ErrorView<'a>>,
}

/// Values available to HTML templates
#[derive(Debug, Serialize)]
struct HtmlContext<'a> {
    title: &'a str,
    version: &'a str,
    file_count: usize,
    files_with_errors: usize,
    error_count: usize,
    severity_counts: Vec<SeverityCount<'a>>,
    /// Sorted by name; errors sorted by line then column
    files: Vec<FileView<'a>>,
}

impl<'a> HtmlContext<'a> {
    fn new(report: &'a CheckstyleReport) -> Self {
        let mut by_severity: BTreeMap<&str, usize> = BTreeMap::new();
        for error in report.files.iter().flat_map(|f| &f.errors) {
            *by_severity.entry(error.severity.as_str()).or_default() += 1;
        }

        let mut files: Vec<FileView> = report
            .files
            .iter()
            .map(|f| {
                let mut errors: Vec<&CheckstyleError> = f.errors.iter().collect();
                errors.sort_by_key(|e| (e.line, e.column));
                FileView {
                    name: &f.name,
                    errors: errors
                        .into_iter()
                        .map(|e| ErrorView {
                            severity: &e.severity,
                            line: e.line,
                            column: e.column,
                            message: &e.message,
                            source: e.source.as_deref(),
                        })
                        .collect(),
                }
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            title: "Shellcheck Audit",
            version: &report.version,
            file_count: report.files.len(),
            files_with_errors: summarize(report).files_with_errors,
            error_count: report.error_count(),
            severity_counts: by_severity
                .into_iter()
                .map(|(severity, count)| SeverityCount { severity, count })
                .collect(),
            files,
        }
    }
}

fn render_error(path: &Path, message: impl std::fmt::Display) -> ShellcheckError {
    ShellcheckError::ReportRender {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Tera error messages live in the source chain
fn tera_message(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}

/// Render the HTML report for the checkstyle document at `xml_path`.
pub fn render_html(xml_path: &Path, stylesheet: Option<&Path>, destination: &Path) -> Result<()> {
    let xml = fs::read_to_string(xml_path).map_err(|e| render_error(destination, format!("{}: {e}", xml_path.display())))?;
    let report = CheckstyleReport::from_xml(&xml).map_err(|e| render_error(destination, e))?;

    let template = match stylesheet {
        Some(path) => {
            log::debug!("Using HTML template {}", path.display());
            fs::read_to_string(path).map_err(|e| render_error(destination, format!("{}: {e}", path.display())))?
        }
        None => DEFAULT_HTML_TEMPLATE.to_string(),
    };

    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, &template)
        .map_err(|e| render_error(destination, tera_message(&e)))?;
    let context =
        Context::from_serialize(HtmlContext::new(&report)).map_err(|e| render_error(destination, tera_message(&e)))?;
    let html = tera
        .render(TEMPLATE_NAME, &context)
        .map_err(|e| render_error(destination, tera_message(&e)))?;

    write_artifact(destination, &html)
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ShellcheckError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ShellcheckError::io(path, e))
}

/// Paths written by [`render`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedReports {
    pub xml: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub txt: Option<PathBuf>,
}

/// Write every enabled report.
///
/// `tty_output` is shellcheck's human readable output and becomes the text
/// report as is. `scratch_dir` holds the temporary XML needed when HTML is
/// enabled without XML.
pub fn render(
    report: &CheckstyleReport,
    tty_output: Option<&str>,
    reports: &ReportsConfig,
    scratch_dir: &Path,
) -> Result<RenderedReports> {
    let mut rendered = RenderedReports::default();

    if reports.xml.enabled || reports.html.enabled {
        let xml = report.to_xml()?;

        if reports.html_only() {
            let scratch = tempfile::Builder::new()
                .prefix("shellcheck-")
                .suffix(".xml")
                .tempfile_in(scratch_dir)
                .map_err(|e| ShellcheckError::io(scratch_dir, e))?;
            fs::write(scratch.path(), &xml).map_err(|e| ShellcheckError::io(scratch.path(), e))?;
            log::debug!("Wrote scratch XML to {}", scratch.path().display());

            render_html(scratch.path(), reports.html.stylesheet.as_deref(), &reports.html.destination)?;
            rendered.html = Some(reports.html.destination.clone());

            let scratch_path = scratch.path().to_path_buf();
            scratch.close().map_err(|e| ShellcheckError::io(scratch_path, e))?;
        } else {
            write_artifact(&reports.xml.destination, &xml)?;
            rendered.xml = Some(reports.xml.destination.clone());

            if reports.html.enabled {
                render_html(
                    &reports.xml.destination,
                    reports.html.stylesheet.as_deref(),
                    &reports.html.destination,
                )?;
                rendered.html = Some(reports.html.destination.clone());
            }
        }
    }

    if reports.txt.enabled {
        write_artifact(&reports.txt.destination, tty_output.unwrap_or_default())?;
        rendered.txt = Some(reports.txt.destination.clone());
    }

    for path in [&rendered.xml, &rendered.html, &rendered.txt].into_iter().flatten() {
        log::info!("Wrote report {}", path.display());
    }

    Ok(rendered)
}
