//! The checkstyle XML dialect shellcheck emits, and merging of per-invocation
//! fragments into one report.
//!
//! Each shellcheck invocation prints a complete `<checkstyle>` document. The
//! merger concatenates the `<file>` elements of every document, in invocation
//! order, under a single root.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellcheckError};
use crate::planner::ToolFormat;

/// What shellcheck prints instead of XML when it was given no files
pub const NO_FILES_SENTINEL: &str = "No files specified.";

/// Prefix every checkstyle document starts with
pub const XML_DECLARATION: &str = "<?xml version";

/// Checkstyle format version written on the merged root
pub const CHECKSTYLE_VERSION: &str = "4.3";

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn default_version() -> String {
    CHECKSTYLE_VERSION.to_string()
}

/// Root `<checkstyle>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "checkstyle")]
pub struct CheckstyleReport {
    #[serde(rename = "@version", default = "default_version")]
    pub version: String,
    #[serde(rename = "file", default)]
    pub files: Vec<CheckstyleFile>,
}

/// `<file name="...">`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckstyleFile {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "error", default)]
    pub errors: Vec<CheckstyleError>,
}

/// `<error line=".." column=".." severity=".." message=".." source=".."/>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckstyleError {
    #[serde(rename = "@line", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(rename = "@column", default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(rename = "@severity")]
    pub severity: String,
    #[serde(rename = "@message")]
    pub message: String,
    #[serde(rename = "@source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Default for CheckstyleReport {
    fn default() -> Self {
        Self {
            version: default_version(),
            files: Vec::new(),
        }
    }
}

impl CheckstyleReport {
    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.errors.len()).sum()
    }

    /// Parse a complete checkstyle document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).map_err(|e| ShellcheckError::MalformedReport { message: e.to_string() })
    }

    /// Serialize as an indented document with an XML declaration.
    pub fn to_xml(&self) -> Result<String> {
        let mut body = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut body);
        ser.indent(' ', 2);
        self.serialize(ser)
            .map_err(|e| ShellcheckError::MalformedReport { message: e.to_string() })?;
        Ok(format!("{XML_HEADER}\n{body}\n"))
    }
}

/// Output of one shellcheck invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInvocationResult {
    pub format: ToolFormat,
    pub text: String,
}

impl RawInvocationResult {
    pub fn checkstyle(text: impl Into<String>) -> Self {
        Self {
            format: ToolFormat::Checkstyle,
            text: text.into(),
        }
    }

    pub fn tty(text: impl Into<String>) -> Self {
        Self {
            format: ToolFormat::Tty,
            text: text.into(),
        }
    }
}

/// Parse one invocation's checkstyle output.
///
/// Empty output and the "no files" sentinel yield `None`; the sentinel may
/// follow other noise, such as a container image being pulled. Anything
/// printed before the XML declaration is discarded. Any other output without
/// a declaration is shellcheck (or the shell) complaining, and is returned
/// verbatim as [`ShellcheckError::ToolOutput`].
pub fn parse_fragment(text: &str) -> Result<Option<CheckstyleReport>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(start) = trimmed.find(XML_DECLARATION) else {
        if trimmed.lines().any(|line| line.trim_start().starts_with(NO_FILES_SENTINEL)) {
            return Ok(None);
        }
        return Err(ShellcheckError::ToolOutput {
            output: text.to_string(),
        });
    };
    if start > 0 {
        log::debug!("Discarding output before XML declaration: {}", &trimmed[..start]);
    }
    CheckstyleReport::from_xml(&trimmed[start..]).map(Some)
}

/// Accumulates checkstyle fragments into one report.
#[derive(Debug, Default)]
pub struct CheckstyleMerger {
    report: CheckstyleReport,
}

impl CheckstyleMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing report, appending further fragments to it.
    pub fn from_report(report: CheckstyleReport) -> Self {
        Self { report }
    }

    /// Append every `<file>` of `fragment`, keeping their order.
    pub fn append(&mut self, fragment: CheckstyleReport) {
        self.report.files.extend(fragment.files);
    }

    /// Parse and append one invocation result. Results in another format are
    /// ignored.
    pub fn push(&mut self, raw: &RawInvocationResult) -> Result<()> {
        if raw.format != ToolFormat::Checkstyle {
            log::debug!("Ignoring {} output in checkstyle merge", raw.format);
            return Ok(());
        }
        if let Some(fragment) = parse_fragment(&raw.text)? {
            self.append(fragment);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.report.files.is_empty()
    }

    pub fn finish(self) -> CheckstyleReport {
        self.report
    }
}

/// Merge all results, failing on the first one that is not checkstyle XML.
pub fn merge(results: &[RawInvocationResult]) -> Result<CheckstyleReport> {
    let mut merger = CheckstyleMerger::new();
    for raw in results {
        merger.push(raw)?;
    }
    Ok(merger.finish())
}
