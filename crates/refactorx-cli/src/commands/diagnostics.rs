//! Diagnostics command
//!
//! Usage: refactorx diagnostics <PATH> [--severity <LEVEL>]

use crate::session::{open, print_json};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DiagnosticsArgs {
    pub path: PathBuf,

    /// Minimum severity: hidden, info, warning or error
    #[arg(long)]
    pub severity: Option<String>,
}

pub async fn execute(config: Option<&Path>, args: DiagnosticsArgs) -> anyhow::Result<()> {
    let session = open(config, &args.path).await?;
    let diagnostics = session
        .workspace
        .list_diagnostics(args.severity.as_deref(), &session.cancel)
        .await?;
    print_json(&diagnostics)
}
