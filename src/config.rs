//!
//! This module defines the configuration structures and loading logic for shcheck.
//! Configuration lives in a `.shcheck.toml` file; every key has a default so an
//! empty (or missing) file is a valid configuration.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::sources::SourceSet;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".shcheck.toml";

/// Minimum severity shellcheck reports, passed through as `--severity=<level>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Style,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Style => "style",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "style" => Ok(Severity::Style),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {s} (expected style, info, warning or error)")),
        }
    }
}

/// One report artifact: whether it is produced and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportTarget {
    #[serde(default)]
    pub enabled: bool,
    pub destination: PathBuf,
}

impl ReportTarget {
    pub fn new(enabled: bool, destination: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            destination: destination.into(),
        }
    }
}

/// The HTML report, which may use its own template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HtmlReportTarget {
    #[serde(default)]
    pub enabled: bool,
    pub destination: PathBuf,
    /// Template replacing the bundled HTML layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,
}

/// Report artifacts produced at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReportsConfig {
    pub xml: ReportTarget,
    pub html: HtmlReportTarget,
    pub txt: ReportTarget,
}

const DEFAULT_REPORT_DIR: &str = "build/reports/shellcheck";

impl Default for ReportsConfig {
    fn default() -> Self {
        let dir = Path::new(DEFAULT_REPORT_DIR);
        Self {
            xml: ReportTarget::new(true, dir.join("shellcheck.xml")),
            html: HtmlReportTarget {
                enabled: true,
                destination: dir.join("shellcheck.html"),
                stylesheet: None,
            },
            txt: ReportTarget::new(false, dir.join("shellcheck.txt")),
        }
    }
}

impl ReportsConfig {
    /// HTML needs an XML document to derive from; when XML itself was not
    /// requested it is written to a scratch file and removed afterwards.
    pub fn html_only(&self) -> bool {
        self.html.enabled && !self.xml.enabled
    }

    /// Resolve relative destinations against `base`
    pub fn rooted_at(&self, base: &Path) -> Self {
        let root = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { base.join(p) };
        Self {
            xml: ReportTarget::new(self.xml.enabled, root(&self.xml.destination)),
            html: HtmlReportTarget {
                enabled: self.html.enabled,
                destination: root(&self.html.destination),
                stylesheet: self.html.stylesheet.as_deref().map(root),
            },
            txt: ReportTarget::new(self.txt.enabled, root(&self.txt.destination)),
        }
    }
}

/// Represents the complete configuration loaded from `.shcheck.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Directories scanned recursively for shell scripts
    pub sources: Vec<PathBuf>,
    /// Individual files, each checked on its own
    pub source_files: Vec<PathBuf>,
    /// Run shellcheck inside a container instead of a local binary
    pub use_container: bool,
    pub container_image: String,
    /// Image tag, e.g. `v0.7.1`
    pub tool_version: String,
    /// Local shellcheck binary, used when `use-container` is false
    pub binary: String,
    pub severity: Severity,
    /// Extra arguments appended to every shellcheck call, split on whitespace
    pub extra_args: String,
    /// Warn instead of failing when violations are found
    pub ignore_failures: bool,
    /// Print shellcheck's tty output to the console
    pub show_violations: bool,
    /// Package manager used to install shellcheck before the run (empty: none)
    pub installer: String,
    /// Directory commands run in; defaults to the current directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Seconds allowed per shellcheck invocation, 0 disables the limit
    pub timeout: u64,
    pub reports: ReportsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            source_files: Vec::new(),
            use_container: true,
            container_image: "koalaman/shellcheck-alpine".to_string(),
            tool_version: "v0.7.1".to_string(),
            binary: "/usr/local/bin/shellcheck".to_string(),
            severity: Severity::Style,
            extra_args: String::new(),
            ignore_failures: false,
            show_violations: true,
            installer: String::new(),
            working_dir: None,
            timeout: 0,
            reports: ReportsConfig::default(),
        }
    }
}

/// Settings the invocation planner and executor work from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    pub use_container: bool,
    /// `<image>:<tag>`
    pub container_image: String,
    pub binary: String,
    pub severity: Severity,
    pub extra_args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from `path`, or from `.shcheck.toml` in `working_dir`
    /// when no path is given. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (working_dir.join(CONFIG_FILE_NAME), false),
        };

        if !explicit && !path.exists() {
            log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, working_dir.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn source_set(&self) -> SourceSet {
        SourceSet {
            directories: self.sources.iter().cloned().collect::<IndexSet<_>>(),
            files: self.source_files.iter().cloned().collect::<IndexSet<_>>(),
        }
    }

    /// Snapshot of the settings relevant to invoking shellcheck.
    pub fn execution(&self, working_dir: &Path) -> ExecutionConfig {
        ExecutionConfig {
            use_container: self.use_container,
            container_image: format!("{}:{}", self.container_image, self.tool_version),
            binary: self.binary.clone(),
            severity: self.severity,
            extra_args: self.extra_args.split_whitespace().map(str::to_string).collect(),
            working_dir: working_dir.to_path_buf(),
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
        }
    }
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::FileExists {
            path: path.display().to_string(),
        });
    }

    let default_config = r#"# shcheck configuration file

# Directories scanned recursively for *.sh, *.bash, *.ksh and shell rc files
sources = ["scripts"]

# Individual files, each checked by its own shellcheck invocation
# source-files = ["bin/entrypoint.sh"]

# Run shellcheck in a container (true) or from a local binary (false)
use-container = true
container-image = "koalaman/shellcheck-alpine"
tool-version = "v0.7.1"
# binary = "/usr/local/bin/shellcheck"

# Minimum severity reported: style, info, warning or error
severity = "style"

# Extra arguments for every shellcheck call
# extra-args = "--exclude=SC1090"

# Warn instead of failing when violations are found
ignore-failures = false

# Print shellcheck's own output to the console
show-violations = true

# Install shellcheck with this package manager before checking (e.g. "brew")
# installer = ""

# Seconds allowed per shellcheck invocation (0: no limit)
timeout = 0

[reports.xml]
enabled = true
destination = "build/reports/shellcheck/shellcheck.xml"

[reports.html]
enabled = true
destination = "build/reports/shellcheck/shellcheck.html"
# stylesheet = "config/shellcheck-report.html.tera"

[reports.txt]
enabled = false
destination = "build/reports/shellcheck/shellcheck.txt"
"#;

    fs::write(path, default_config).map_err(|err| ConfigError::IoError {
        source: err,
        path: path.display().to_string(),
    })
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.use_container);
        assert!(config.show_violations);
        assert!(!config.ignore_failures);
        assert_eq!(config.tool_version, "v0.7.1");
        assert_eq!(config.severity, Severity::Style);
        assert!(config.reports.xml.enabled);
        assert!(config.reports.html.enabled);
        assert!(!config.reports.txt.enabled);
        assert!(config.source_set().is_empty());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_deserialize_config() {
        let toml = r#"
sources = ["scripts", "ci"]
source-files = ["bin/run.sh"]
use-container = false
binary = "/opt/bin/shellcheck"
severity = "warning"
extra-args = "-x  --exclude=SC1090"
ignore-failures = true
timeout = 30

[reports.xml]
enabled = false
destination = "out/sc.xml"

[reports.html]
enabled = true
destination = "out/sc.html"
stylesheet = "report.tera"
"#;
        let config = Config::from_toml(toml).expect("Failed to parse TOML");

        assert_eq!(config.sources, vec![PathBuf::from("scripts"), PathBuf::from("ci")]);
        assert_eq!(config.source_files, vec![PathBuf::from("bin/run.sh")]);
        assert!(!config.use_container);
        assert_eq!(config.severity, Severity::Warning);
        assert!(config.ignore_failures);
        assert!(config.reports.html_only());
        assert_eq!(config.reports.html.stylesheet, Some(PathBuf::from("report.tera")));
        // untouched sections keep their defaults
        assert_eq!(config.reports.txt, ReportsConfig::default().txt);

        let exec = config.execution(Path::new("/work"));
        assert_eq!(exec.extra_args, vec!["-x", "--exclude=SC1090"]);
        assert_eq!(exec.container_image, "koalaman/shellcheck-alpine:v0.7.1");
        assert_eq!(exec.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let err = Config::from_toml(r#"severity = "fatal""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!("fatal".parse::<Severity>().is_err());
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
    }

    #[test]
    fn test_load_missing_default_and_explicit() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap(), Config::default());

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing), dir.path()),
            Err(ConfigError::IoError { .. })
        ));
    }

    #[test]
    fn test_default_config_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        create_default_config(&path).unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.sources, vec![PathBuf::from("scripts")]);
        assert_eq!(config.reports, ReportsConfig::default());

        assert!(matches!(
            create_default_config(&path),
            Err(ConfigError::FileExists { .. })
        ));
    }

    #[test]
    fn test_reports_rooted_at() {
        let reports = ReportsConfig::default().rooted_at(Path::new("/project"));
        assert_eq!(
            reports.xml.destination,
            PathBuf::from("/project/build/reports/shellcheck/shellcheck.xml")
        );
    }
}
