//! Workspace construction shared by every command.

use anyhow::{bail, Context};
use refactorx_analysis::{builtin_registry, FsAnalysisEngine};
use refactorx_core::RefactorxConfig;
use refactorx_engine::{InitializeOutcome, Workspace};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// An initialized workspace plus the token Ctrl-C cancels
pub struct Session {
    pub workspace: Workspace,
    pub cancel: CancellationToken,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<RefactorxConfig> {
    match path {
        Some(path) => RefactorxConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(RefactorxConfig::default()),
    }
}

/// Build a workspace over the built-in analysis engine without loading anything
pub fn workspace(config: RefactorxConfig) -> Workspace {
    let engine = FsAnalysisEngine::new(config.layout.clone());
    Workspace::new(Arc::new(engine), builtin_registry(), config)
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; cancelling");
            token.cancel();
        }
    });
    cancel
}

/// Load `project` and fail unless initialization succeeded
pub async fn open(config: Option<&Path>, project: &Path) -> anyhow::Result<Session> {
    let (session, outcome) = start(config, project).await?;
    if !outcome.success {
        bail!("initialization failed: {}", outcome.message);
    }
    Ok(session)
}

/// Load `project` and return the outcome whatever it was
pub async fn start(config: Option<&Path>, project: &Path) -> anyhow::Result<(Session, InitializeOutcome)> {
    let workspace = workspace(load_config(config)?);
    let cancel = cancel_on_ctrl_c();
    let outcome = workspace.initialize(project, &cancel).await;
    Ok((Session { workspace, cancel }, outcome))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{text}");
    Ok(())
}
