//! Apply command
//!
//! Usage: refactorx apply <PATH> --select <INDEX> [--commit] [query flags]
//!
//! Discovers actions with the same query flags as `actions`, then applies
//! the one at INDEX (0-based) of that list. Preview unless `--commit`.

use super::actions::QueryArgs;
use crate::session::{open, print_json};
use anyhow::{anyhow, bail};
use clap::Args;
use refactorx_engine::ApplyMode;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    pub path: PathBuf,

    /// Position of the action in the `actions` output
    #[arg(long)]
    pub select: usize,

    /// Write the changes instead of previewing them
    #[arg(long)]
    pub commit: bool,

    #[command(flatten)]
    pub query: QueryArgs,
}

pub async fn execute(config: Option<&Path>, args: ApplyArgs) -> anyhow::Result<()> {
    let query = args.query.to_query()?;
    let session = open(config, &args.path).await?;
    let actions = session
        .workspace
        .list_actions(query, &session.cancel)
        .await?;
    let action = actions.get(args.select).ok_or_else(|| {
        anyhow!(
            "no action at index {} ({} available)",
            args.select,
            actions.len()
        )
    })?;

    let mode = if args.commit {
        ApplyMode::Commit
    } else {
        ApplyMode::Preview
    };
    let outcome = session
        .workspace
        .apply_action(&action.id, mode, &session.cancel)
        .await;
    print_json(&outcome)?;

    if !outcome.success {
        bail!(
            "'{}' failed: {}",
            action.title,
            outcome.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
