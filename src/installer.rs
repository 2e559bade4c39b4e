//! Installing shellcheck through a system package manager.

use std::path::Path;

use crate::executor::CommandExecutor;

/// Installer id → commands run in order.
static INSTALLER_COMMANDS: phf::Map<&'static str, &'static [&'static str]> = phf::phf_map! {
    "cabal" => &["cabal update", "cabal install ShellCheck"],
    "stack" => &["stack update", "stack install ShellCheck"],
    "apt-get" => &["apt-get install shellcheck"],
    "pacman" => &["pacman -S shellcheck"],
    "emerge" => &["emerge --ask shellcheck"],
    "yum" => &["yum -y install epel-release", "yum install ShellCheck"],
    "dnf" => &["dnf install ShellCheck"],
    "pkg" => &["pkg install hs-ShellCheck"],
    "brew" => &["brew install shellcheck"],
    "port" => &["sudo port install shellcheck"],
    "pkg_add" => &["pkg_add shellcheck"],
    "zypper" => &["zypper in ShellCheck"],
    "eopkg" => &["eopkg install shellcheck"],
    "conda" => &["conda install -c conda-forge shellcheck"],
    "snap" => &["snap install --channel=edge shellcheck"],
    "nix-env" => &["nix-env -iA nixpkgs.shellcheck"],
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstallerError {
    #[error("Installer {0} is not supported")]
    Unsupported(String),
}

/// Commands for `installer`, in the order they must run.
pub fn installer_commands(installer: &str) -> Result<&'static [&'static str], InstallerError> {
    INSTALLER_COMMANDS
        .get(installer)
        .copied()
        .ok_or_else(|| InstallerError::Unsupported(installer.to_string()))
}

/// Every supported installer id, sorted.
pub fn supported_installers() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = INSTALLER_COMMANDS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Whether `shellcheck` is already on the search path, as seen through `executor`.
fn shellcheck_on_path(executor: &dyn CommandExecutor, working_dir: &Path) -> crate::error::Result<bool> {
    let command = ["sh", "-c", "command -v shellcheck || echo 'shellcheck: command not found'"]
        .map(str::to_string);
    let output = executor.execute(&command, working_dir)?;
    log::debug!("command -v shellcheck returned: {output}");
    Ok(!output.contains("shellcheck: command not found"))
}

/// Install shellcheck with `installer` unless it is empty.
///
/// The installer id is validated before anything runs. Homebrew installs are
/// skipped when shellcheck is already available. Installer output is logged
/// and otherwise ignored; a failed install shows up later when shellcheck
/// cannot be launched.
pub fn maybe_install(installer: &str, executor: &dyn CommandExecutor, working_dir: &Path) -> crate::error::Result<()> {
    if installer.is_empty() {
        return Ok(());
    }

    let commands = installer_commands(installer)?;

    if installer == "brew" && shellcheck_on_path(executor, working_dir)? {
        log::debug!("Shellcheck is already installed. Skipping installation.");
        return Ok(());
    }

    for command in commands {
        log::info!("Installing shellcheck: {command}");
        let argv: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        let output = executor.execute(&argv, working_dir)?;
        log::debug!("{command}: {output}");
    }
    Ok(())
}
