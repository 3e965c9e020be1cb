//! Recover command
//!
//! Usage: refactorx recover <PATH> <SYMBOL> [--implementation]

use crate::session::{open, print_json};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RecoverArgs {
    pub path: PathBuf,

    /// Type name, simple (`JsonConvert`) or namespace-qualified
    pub symbol: String,

    /// Include method bodies, not just signatures
    #[arg(long)]
    pub implementation: bool,
}

/// Prints `null` when no source could be recovered
pub async fn execute(config: Option<&Path>, args: RecoverArgs) -> anyhow::Result<()> {
    let session = open(config, &args.path).await?;
    let text = session
        .workspace
        .recover_external_source(&args.symbol, args.implementation, &session.cancel)
        .await;
    print_json(&text)
}
