use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::*;
use std::path::PathBuf;

use shcheck_lib::exit_codes::{SUCCESS, TOOL_ERROR, VIOLATIONS_FOUND, exit};

mod cli_types;
mod commands;

use cli_types::CheckArgs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run shellcheck and write the configured reports
    Check(CheckArgs),
    /// Install shellcheck with a package manager
    Install {
        /// Installer to use (default: `installer` from the configuration)
        installer: Option<String>,
        /// List supported installers
        #[arg(long)]
        list: bool,
    },
    /// Create a default .shcheck.toml
    Init {
        /// Where to write the configuration file
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (default: detected from $SHELL)
        shell: Option<Shell>,
        /// List available shells
        #[arg(long)]
        list: bool,
    },
    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Check(args) => commands::check::handle_check(args),
        Commands::Install { installer, list } => commands::install::handle_install(installer.as_deref(), *list),
        Commands::Init { path } => Ok(commands::init::handle_init(path.as_deref())),
        Commands::Completions { shell, list } => Ok(commands::completions::handle_completions(*shell, *list)),
        Commands::Version => {
            commands::version::handle_version();
            Ok(SUCCESS)
        }
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            TOOL_ERROR
        }
    };
    match code {
        SUCCESS => exit::success(),
        VIOLATIONS_FOUND => exit::violations_found(),
        _ => exit::tool_error(),
    }
}
