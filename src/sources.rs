//! Source resolution: turn configured directories and files into check targets.

use ignore::WalkBuilder;
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// File name suffixes recognised as shell scripts when scanning directories.
///
/// Matched against the end of the file name, so `.bashrc` matches `bashrc`.
pub const SHELL_EXTENSIONS: &[&str] = &["sh", "bash", "ksh", "bashrc", "bash_profile", "bash_login", "bash_logout"];

/// The directories and files a run was asked to check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    /// Scanned recursively for scripts matching [`SHELL_EXTENSIONS`]
    pub directories: IndexSet<PathBuf>,
    /// Checked verbatim, one invocation each
    pub files: IndexSet<PathBuf>,
}

impl SourceSet {
    pub fn new<D, F>(directories: D, files: F) -> Self
    where
        D: IntoIterator<Item = PathBuf>,
        F: IntoIterator<Item = PathBuf>,
    {
        Self {
            directories: directories.into_iter().collect(),
            files: files.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

/// Targets left after resolution, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSources {
    /// One batched invocation per directory
    pub batched_dirs: IndexSet<PathBuf>,
    /// One invocation per file
    pub individual_files: IndexSet<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing left to check; the run is a no-op success.
    NothingToCheck,
    Targets(ResolvedSources),
}

/// Whether a file name carries one of the recognised shell suffixes.
pub fn is_shell_script(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    SHELL_EXTENSIONS.iter().any(|ext| {
        name.len() > ext.len() && name.ends_with(ext) && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}

/// Every shell script below `dir`, sorted by path.
///
/// Hidden files and ignore files are not special here: the batched
/// invocation runs `find`, which sees everything, and the two must agree.
pub fn shell_scripts_in(dir: &Path) -> Vec<PathBuf> {
    let mut scripts: Vec<PathBuf> = WalkBuilder::new(dir)
        .standard_filters(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| is_shell_script(path))
        .collect();
    scripts.sort();
    scripts
}

fn absolutize(path: &Path, working_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

/// Resolve a source set against `working_dir`.
///
/// Directories that are missing or hold no shell script are dropped.
/// Explicit files are kept as given (made absolute), so the tool itself
/// reports on paths that do not exist.
pub fn resolve(sources: &SourceSet, working_dir: &Path) -> Resolution {
    let mut resolved = ResolvedSources::default();

    for dir in &sources.directories {
        let dir = absolutize(dir, working_dir);
        if !dir.is_dir() {
            log::warn!("Source directory {} does not exist, skipping", dir.display());
            continue;
        }
        let scripts = shell_scripts_in(&dir);
        if scripts.is_empty() {
            log::info!("No shell scripts found under {}", dir.display());
            continue;
        }
        log::debug!("Found {} shell script(s) under {}", scripts.len(), dir.display());
        resolved.batched_dirs.insert(dir);
    }

    for file in &sources.files {
        resolved.individual_files.insert(absolutize(file, working_dir));
    }

    if resolved.batched_dirs.is_empty() && resolved.individual_files.is_empty() {
        Resolution::NothingToCheck
    } else {
        Resolution::Targets(resolved)
    }
}
