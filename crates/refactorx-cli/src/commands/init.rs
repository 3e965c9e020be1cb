//! Init command
//!
//! Usage: refactorx init <PATH>

use crate::session::{print_json, start};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Root definition file, module file or directory containing one
    pub path: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitReport<'a> {
    #[serde(flatten)]
    outcome: &'a refactorx_engine::InitializeOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<refactorx_store::LoadWarning>,
}

pub async fn execute(config: Option<&Path>, args: InitArgs) -> anyhow::Result<()> {
    let (session, outcome) = start(config, &args.path).await?;
    let warnings = session.workspace.load_warnings().await;
    print_json(&InitReport {
        outcome: &outcome,
        warnings,
    })?;
    if !outcome.success {
        anyhow::bail!("initialization failed");
    }
    Ok(())
}
