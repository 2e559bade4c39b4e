#![allow(dead_code)]

use shcheck_lib::{CommandExecutor, Config, ExecutorError};
use std::cell::RefCell;
use std::fs;
use std::path::Path;

pub const SENTINEL: &str = "No files specified.\n\nUsage: shellcheck [OPTIONS...] FILES...";

/// Checkstyle output for one file, with one error per `(line, severity)`
pub fn checkstyle_for(name: &str, errors: &[(u32, &str)]) -> String {
    let mut xml = String::from("<?xml version='1.0' encoding='UTF-8'?>\n<checkstyle version='4.3'>\n");
    xml.push_str(&format!("<file name='{name}' >\n"));
    for (line, severity) in errors {
        xml.push_str(&format!(
            "<error line='{line}' column='1' severity='{severity}' message='Problem on line {line}' source='ShellCheck.SC2086' />\n"
        ));
    }
    xml.push_str("</file>\n</checkstyle>\n");
    xml
}

/// Checkstyle output reporting each name as a clean file
pub fn clean_checkstyle(names: &[&str]) -> String {
    let mut xml = String::from("<?xml version='1.0' encoding='UTF-8'?>\n<checkstyle version='4.3'>\n");
    for name in names {
        xml.push_str(&format!("<file name='{name}' >\n</file>\n"));
    }
    xml.push_str("</checkstyle>\n");
    xml
}

struct Response {
    needle: String,
    checkstyle: String,
    tty: String,
}

/// Answers shellcheck invocations with canned output chosen by target path.
///
/// A response matches when its needle occurs in the space-joined command. The
/// `-f` argument selects between the checkstyle and tty answers.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Vec<Response>,
    fallback: Option<String>,
    failure: Option<ExecutorError>,
    pub calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, needle: impl Into<String>, checkstyle: impl Into<String>, tty: impl Into<String>) -> Self {
        self.responses.push(Response {
            needle: needle.into(),
            checkstyle: checkstyle.into(),
            tty: tty.into(),
        });
        self
    }

    /// Output for commands no response matches
    pub fn otherwise(mut self, output: impl Into<String>) -> Self {
        self.fallback = Some(output.into());
        self
    }

    /// Fail every command with `error`
    pub fn failing(mut self, error: ExecutorError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Commands that asked for the given output format
    pub fn calls_in_format(&self, format: &str) -> usize {
        let flag = format!("-f {format}");
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.join(" ").contains(&flag))
            .count()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&self, command: &[String], _working_dir: &Path) -> Result<String, ExecutorError> {
        self.calls.borrow_mut().push(command.to_vec());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let joined = command.join(" ");
        let tty = joined.contains("-f tty");
        for response in &self.responses {
            if joined.contains(&response.needle) {
                return Ok(if tty {
                    response.tty.clone()
                } else {
                    response.checkstyle.clone()
                });
            }
        }
        Ok(self.fallback.clone().unwrap_or_default())
    }
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Local-binary configuration with console output off and default report paths.
pub fn local_config() -> Config {
    Config {
        use_container: false,
        binary: "shellcheck".to_string(),
        show_violations: false,
        ..Default::default()
    }
}
