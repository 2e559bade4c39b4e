//! Invocation planning: build the shellcheck command lines for a run.
//!
//! Every resolved directory becomes one batched invocation that pipes the
//! scripts found by `find` into a single shellcheck call. Every explicit file
//! becomes its own invocation, so a bad path cannot take the others down with
//! it. In container mode each command is prefixed with a `docker run` that
//! bind-mounts the working directory at the same path.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ExecutionConfig;
use crate::sources::{ResolvedSources, SHELL_EXTENSIONS};

/// Container runtime used in container mode
pub const CONTAINER_RUNTIME: &str = "docker";
/// Name of the shellcheck binary inside the container image
pub const CONTAINER_BINARY: &str = "shellcheck";

/// Output format requested from shellcheck with `-f`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolFormat {
    /// checkstyle XML, the input of every report
    Checkstyle,
    /// Human readable output for the console and the text report
    Tty,
}

impl ToolFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolFormat::Checkstyle => "checkstyle",
            ToolFormat::Tty => "tty",
        }
    }
}

impl fmt::Display for ToolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single invocation checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Directory(PathBuf),
    File(PathBuf),
}

impl Target {
    pub fn path(&self) -> &Path {
        match self {
            Target::Directory(p) | Target::File(p) => p,
        }
    }
}

/// A fully built shellcheck command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub format: ToolFormat,
    pub target: Target,
    pub command: Vec<String>,
}

/// Quote `s` for a POSIX shell.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'.' | b'_' | b'-' | b'=' | b':' | b','))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `find` expression selecting every recognised shell script under `dir`
fn find_expression(dir: &Path) -> String {
    let names: Vec<String> = SHELL_EXTENSIONS
        .iter()
        .map(|ext| format!("-name '*.{ext}'"))
        .collect();
    format!(
        "find {} -type f \\( {} \\) -print0",
        shell_quote(&path_str(dir)),
        names.join(" -o ")
    )
}

/// Arguments that follow the binary in every invocation
fn tool_args(config: &ExecutionConfig, format: ToolFormat) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        format.as_str().to_string(),
        format!("--severity={}", config.severity),
    ];
    args.extend(config.extra_args.iter().cloned());
    args
}

/// Host paths the container needs to see besides the working directory
fn extra_mounts(resolved: &ResolvedSources, working_dir: &Path) -> Vec<PathBuf> {
    let mut mounts: Vec<PathBuf> = Vec::new();
    let dirs = resolved.batched_dirs.iter().cloned();
    let file_parents = resolved
        .individual_files
        .iter()
        .filter_map(|f| f.parent().map(Path::to_path_buf));
    for dir in dirs.chain(file_parents) {
        if dir.starts_with(working_dir) || mounts.iter().any(|m| dir.starts_with(m)) {
            continue;
        }
        mounts.push(dir);
    }
    mounts
}

fn container_prefix(config: &ExecutionConfig, mounts: &[PathBuf], entrypoint: &str) -> Vec<String> {
    let wd = path_str(&config.working_dir);
    let mut prefix = vec![
        CONTAINER_RUNTIME.to_string(),
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{wd}:{wd}"),
    ];
    for mount in mounts {
        let m = path_str(mount);
        prefix.push("-v".to_string());
        prefix.push(format!("{m}:{m}"));
    }
    prefix.extend([
        "-w".to_string(),
        wd,
        "--entrypoint".to_string(),
        entrypoint.to_string(),
        config.container_image.clone(),
    ]);
    prefix
}

fn plan_directory(config: &ExecutionConfig, format: ToolFormat, dir: &Path, mounts: &[PathBuf]) -> Invocation {
    let binary = if config.use_container {
        CONTAINER_BINARY.to_string()
    } else {
        config.binary.clone()
    };
    let mut tool = vec![shell_quote(&binary)];
    tool.extend(tool_args(config, format).iter().map(|a| shell_quote(a)));
    let script = format!("{} | sort -z | xargs -0 {}", find_expression(dir), tool.join(" "));

    let mut command = if config.use_container {
        container_prefix(config, mounts, "sh")
    } else {
        vec!["sh".to_string()]
    };
    command.push("-c".to_string());
    command.push(script);

    Invocation {
        format,
        target: Target::Directory(dir.to_path_buf()),
        command,
    }
}

fn plan_file(config: &ExecutionConfig, format: ToolFormat, file: &Path, mounts: &[PathBuf]) -> Invocation {
    let mut command = if config.use_container {
        container_prefix(config, mounts, CONTAINER_BINARY)
    } else {
        vec![config.binary.clone()]
    };
    command.extend(tool_args(config, format));
    command.push(path_str(file));

    Invocation {
        format,
        target: Target::File(file.to_path_buf()),
        command,
    }
}

/// Build every invocation for `resolved`: batched directories first, then
/// individual files, each in resolution order.
pub fn plan(resolved: &ResolvedSources, config: &ExecutionConfig, format: ToolFormat) -> Vec<Invocation> {
    let mounts = if config.use_container {
        extra_mounts(resolved, &config.working_dir)
    } else {
        Vec::new()
    };

    let dirs = resolved
        .batched_dirs
        .iter()
        .map(|dir| plan_directory(config, format, dir, &mounts));
    let files = resolved
        .individual_files
        .iter()
        .map(|file| plan_file(config, format, file, &mounts));
    dirs.chain(files).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Severity;
    use pretty_assertions::assert_eq;

    fn config(use_container: bool) -> ExecutionConfig {
        ExecutionConfig {
            use_container,
            container_image: "koalaman/shellcheck-alpine:v0.7.1".to_string(),
            binary: "/usr/local/bin/shellcheck".to_string(),
            severity: Severity::Warning,
            extra_args: vec!["-x".to_string()],
            working_dir: PathBuf::from("/project"),
            timeout: None,
        }
    }

    fn resolved(dirs: &[&str], files: &[&str]) -> ResolvedSources {
        ResolvedSources {
            batched_dirs: dirs.iter().map(PathBuf::from).collect(),
            individual_files: files.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/project/scripts"), "/project/scripts");
        assert_eq!(shell_quote("--severity=style"), "--severity=style");
        assert_eq!(shell_quote("my dir"), "'my dir'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_local_file_invocation() {
        let invocations = plan(
            &resolved(&[], &["/project/a.sh"]),
            &config(false),
            ToolFormat::Checkstyle,
        );
        assert_eq!(invocations.len(), 1);
        assert_eq!(
            invocations[0].command,
            vec![
                "/usr/local/bin/shellcheck",
                "-f",
                "checkstyle",
                "--severity=warning",
                "-x",
                "/project/a.sh"
            ]
        );
        assert_eq!(invocations[0].target, Target::File(PathBuf::from("/project/a.sh")));
    }

    #[test]
    fn test_local_directory_invocation() {
        let invocations = plan(&resolved(&["/project/scripts"], &[]), &config(false), ToolFormat::Tty);
        let command = &invocations[0].command;
        assert_eq!(&command[..2], &["sh", "-c"]);
        assert_eq!(
            command[2],
            "find /project/scripts -type f \\( -name '*.sh' -o -name '*.bash' -o -name '*.ksh' \
             -o -name '*.bashrc' -o -name '*.bash_profile' -o -name '*.bash_login' \
             -o -name '*.bash_logout' \\) -print0 | sort -z | xargs -0 \
             /usr/local/bin/shellcheck -f tty --severity=warning -x"
        );
    }

    #[test]
    fn test_container_invocations() {
        let invocations = plan(
            &resolved(&["/project/scripts"], &["/project/bin/run.sh"]),
            &config(true),
            ToolFormat::Checkstyle,
        );
        assert_eq!(invocations.len(), 2);

        let dir = &invocations[0].command;
        assert_eq!(
            &dir[..10],
            &[
                "docker",
                "run",
                "--rm",
                "-v",
                "/project:/project",
                "-w",
                "/project",
                "--entrypoint",
                "sh",
                "koalaman/shellcheck-alpine:v0.7.1"
            ]
        );
        assert_eq!(dir[10], "-c");
        assert!(dir[11].ends_with("xargs -0 shellcheck -f checkstyle --severity=warning -x"));

        let file = &invocations[1].command;
        assert_eq!(file[8], "shellcheck");
        assert_eq!(
            &file[9..],
            &[
                "koalaman/shellcheck-alpine:v0.7.1",
                "-f",
                "checkstyle",
                "--severity=warning",
                "-x",
                "/project/bin/run.sh"
            ]
        );
    }

    #[test]
    fn test_container_mounts_sources_outside_working_dir() {
        let invocations = plan(
            &resolved(&["/elsewhere/scripts"], &["/tmp/one.sh", "/tmp/two.sh"]),
            &config(true),
            ToolFormat::Checkstyle,
        );
        let command = &invocations[0].command;
        assert!(command.contains(&"/elsewhere/scripts:/elsewhere/scripts".to_string()));
        assert_eq!(command.iter().filter(|a| *a == "/tmp:/tmp").count(), 1);
    }

    #[test]
    fn test_order_batched_then_files() {
        let invocations = plan(
            &resolved(&["/project/b", "/project/a"], &["/project/z.sh", "/project/y.sh"]),
            &config(false),
            ToolFormat::Checkstyle,
        );
        let targets: Vec<&Path> = invocations.iter().map(|i| i.target.path()).collect();
        assert_eq!(
            targets,
            vec![
                Path::new("/project/b"),
                Path::new("/project/a"),
                Path::new("/project/z.sh"),
                Path::new("/project/y.sh")
            ]
        );
    }

    #[test]
    fn test_planning_is_deterministic() {
        let sources = resolved(&["/project/scripts", "/project/ci"], &["/project/a.sh"]);
        let first = plan(&sources, &config(true), ToolFormat::Checkstyle);
        let _ = plan(&sources, &config(false), ToolFormat::Tty);
        let second = plan(&sources, &config(true), ToolFormat::Checkstyle);
        assert_eq!(first, second);
    }
}
