//! Violation summary derived from a merged checkstyle report.

use std::collections::HashSet;
use std::fmt;

use crate::checkstyle::CheckstyleReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Distinct file names with at least one `<error>`
    pub files_with_errors: usize,
    /// Distinct `severity` values across all errors
    pub distinct_severities: usize,
}

impl ReportSummary {
    pub fn has_violations(&self) -> bool {
        self.files_with_errors > 0
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shellcheck files with violations: {}\nShellcheck violations by severity: {}",
            self.files_with_errors, self.distinct_severities
        )
    }
}

/// Count files with errors and distinct severities.
///
/// Both are set cardinalities: a file name appearing in several `<file>`
/// elements, or a severity shared by many errors, counts once.
pub fn summarize(report: &CheckstyleReport) -> ReportSummary {
    let mut files = HashSet::new();
    let mut severities = HashSet::new();
    for file in &report.files {
        for error in &file.errors {
            files.insert(file.name.as_str());
            severities.insert(error.severity.as_str());
        }
    }
    ReportSummary {
        files_with_errors: files.len(),
        distinct_severities: severities.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkstyle::{CheckstyleError, CheckstyleFile};

    fn error(severity: &str) -> CheckstyleError {
        CheckstyleError {
            line: Some(1),
            column: Some(1),
            severity: severity.to_string(),
            message: "msg".to_string(),
            source: None,
        }
    }

    fn file(name: &str, severities: &[&str]) -> CheckstyleFile {
        CheckstyleFile {
            name: name.to_string(),
            errors: severities.iter().map(|s| error(s)).collect(),
        }
    }

    #[test]
    fn test_empty_report() {
        let summary = summarize(&CheckstyleReport::default());
        assert_eq!(summary, ReportSummary::default());
        assert!(!summary.has_violations());
    }

    #[test]
    fn test_clean_files_do_not_count() {
        let report = CheckstyleReport {
            files: vec![file("a.sh", &[]), file("b.sh", &[])],
            ..Default::default()
        };
        assert_eq!(summarize(&report).files_with_errors, 0);
    }

    #[test]
    fn test_duplicates_collapse() {
        let report = CheckstyleReport {
            files: vec![
                file("a.sh", &["error", "warning"]),
                file("b.sh", &["warning"]),
                file("a.sh", &["style"]),
                file("c.sh", &[]),
            ],
            ..Default::default()
        };
        let summary = summarize(&report);
        assert_eq!(summary.files_with_errors, 2);
        assert_eq!(summary.distinct_severities, 3);
        assert_eq!(summarize(&report), summary);
    }

    #[test]
    fn test_display() {
        let summary = ReportSummary {
            files_with_errors: 2,
            distinct_severities: 1,
        };
        assert_eq!(
            summary.to_string(),
            "Shellcheck files with violations: 2\nShellcheck violations by severity: 1"
        );
    }
}
