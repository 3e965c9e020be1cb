//! refactorx CLI
//!
//! Command-line interface for the refactoring workspace. Every command loads
//! the project first, since action ids do not outlive the process.

use clap::{Parser, Subcommand};
use refactorx_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;
mod session;

#[derive(Debug, Parser)]
#[command(name = "refactorx")]
#[command(about = "refactorx - Diagnostics, fixes and refactorings over a project workspace", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a project and report what was found
    Init(commands::init::InitArgs),
    /// List diagnostics for a project
    Diagnostics(commands::diagnostics::DiagnosticsArgs),
    /// List curated fixes and refactorings
    Actions(commands::actions::ActionsArgs),
    /// Preview or commit one curated action
    Apply(commands::apply::ApplyArgs),
    /// Recover source for a type defined outside the project
    Recover(commands::recover::RecoverArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(config, args).await,
        Commands::Diagnostics(args) => commands::diagnostics::execute(config, args).await,
        Commands::Actions(args) => commands::actions::execute(config, args).await,
        Commands::Apply(args) => commands::apply::execute(config, args).await,
        Commands::Recover(args) => commands::recover::execute(config, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
