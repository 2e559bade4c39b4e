use clap::Args;
use std::path::PathBuf;

use shcheck_lib::config::{Config, Severity};

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Directories scanned recursively for shell scripts (replaces `sources` from the config)
    #[arg(required = false)]
    pub paths: Vec<PathBuf>,

    /// Individual files, each checked on its own (replaces `source-files` from the config)
    #[arg(long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Configuration file path (default: .shcheck.toml in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory shellcheck runs in and relative paths are resolved against.
    /// Replaces `working-dir` from the config and is where the config is looked up.
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Use a local shellcheck binary instead of the container image
    #[arg(long, conflicts_with = "container")]
    pub local: bool,

    /// Run shellcheck in the container image
    #[arg(long)]
    pub container: bool,

    /// Local shellcheck binary
    #[arg(long)]
    pub binary: Option<String>,

    /// Container image tag
    #[arg(long)]
    pub tool_version: Option<String>,

    /// Minimum severity to report: style, info, warning or error
    #[arg(long)]
    pub severity: Option<Severity>,

    /// Extra arguments passed to every shellcheck call
    #[arg(long, allow_hyphen_values = true)]
    pub extra_args: Option<String>,

    /// Warn instead of failing when violations are found
    #[arg(long)]
    pub ignore_failures: bool,

    /// Do not print shellcheck's output
    #[arg(long)]
    pub no_show_violations: bool,

    /// Write the checkstyle XML report here
    #[arg(long, value_name = "PATH", conflicts_with = "no_xml")]
    pub xml: Option<PathBuf>,

    /// Do not keep the XML report
    #[arg(long)]
    pub no_xml: bool,

    /// Write the HTML report here
    #[arg(long, value_name = "PATH", conflicts_with = "no_html")]
    pub html: Option<PathBuf>,

    /// Do not write the HTML report
    #[arg(long)]
    pub no_html: bool,

    /// Template replacing the bundled HTML layout
    #[arg(long, value_name = "PATH")]
    pub html_template: Option<PathBuf>,

    /// Write shellcheck's text output here
    #[arg(long, value_name = "PATH")]
    pub txt: Option<PathBuf>,

    /// Seconds allowed per shellcheck invocation (0: no limit)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl CheckArgs {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if !self.paths.is_empty() {
            config.sources = self.paths.clone();
        }
        if !self.files.is_empty() {
            config.source_files = self.files.clone();
        }
        if self.local {
            config.use_container = false;
        }
        if self.container {
            config.use_container = true;
        }
        if let Some(binary) = &self.binary {
            config.binary = binary.clone();
        }
        if let Some(version) = &self.tool_version {
            config.tool_version = version.clone();
        }
        if let Some(severity) = self.severity {
            config.severity = severity;
        }
        if let Some(extra) = &self.extra_args {
            config.extra_args = extra.clone();
        }
        if self.ignore_failures {
            config.ignore_failures = true;
        }
        if self.no_show_violations {
            config.show_violations = false;
        }
        if let Some(xml) = &self.xml {
            config.reports.xml.enabled = true;
            config.reports.xml.destination = xml.clone();
        }
        if self.no_xml {
            config.reports.xml.enabled = false;
        }
        if let Some(html) = &self.html {
            config.reports.html.enabled = true;
            config.reports.html.destination = html.clone();
        }
        if self.no_html {
            config.reports.html.enabled = false;
        }
        if let Some(template) = &self.html_template {
            config.reports.html.stylesheet = Some(template.clone());
        }
        if let Some(txt) = &self.txt {
            config.reports.txt.enabled = true;
            config.reports.txt.destination = txt.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        CheckArgs::default().apply_to(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let args = CheckArgs {
            paths: vec![PathBuf::from("scripts")],
            local: true,
            severity: Some(Severity::Error),
            no_xml: true,
            txt: Some(PathBuf::from("out.txt")),
            ..Default::default()
        };
        args.apply_to(&mut config);

        assert_eq!(config.sources, vec![PathBuf::from("scripts")]);
        assert!(!config.use_container);
        assert_eq!(config.severity, Severity::Error);
        assert!(config.reports.html_only());
        assert!(config.reports.txt.enabled);
        assert_eq!(config.reports.txt.destination, PathBuf::from("out.txt"));
    }

    #[test]
    fn test_working_dir_is_not_copied_into_config() {
        let mut config = Config::default();
        let args = CheckArgs {
            working_dir: Some(PathBuf::from("proj")),
            ..Default::default()
        };
        args.apply_to(&mut config);
        assert_eq!(config.working_dir, None);
    }
}
