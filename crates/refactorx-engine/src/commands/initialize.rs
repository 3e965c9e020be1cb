//! Workspace initialization.

use crate::bounded::bounded;
use crate::workspace::Workspace;
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::Snapshot;
use refactorx_core::{log_op_end, log_op_error, log_op_start};
use refactorx_core_types::correlation::RequestContext;
use refactorx_store::{resolve_root, ProjectGraph};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::MutexGuard;
use tokio_util::sync::CancellationToken;

/// Result of [`Workspace::initialize`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeOutcome {
    pub success: bool,
    pub message: String,
    pub module_count: usize,
    #[serde(skip)]
    pub error_kind: Option<ExErrorKind>,
}

impl InitializeOutcome {
    fn failed(err: &ExError) -> Self {
        Self {
            success: false,
            message: err.message().to_string(),
            module_count: 0,
            error_kind: Some(err.kind()),
        }
    }
}

impl Workspace {
    /// Load the project graph at `path` and publish it as the current snapshot.
    ///
    /// Replaces any previous snapshot, warnings and cached actions. The old
    /// snapshot is dropped before loading starts, so a failed load leaves the
    /// workspace uninitialized and reads made during the load fail fast.
    /// An initialization that runs out of budget while another structural
    /// operation holds the workspace never starts and changes nothing.
    /// Failures are reported in the outcome.
    pub async fn initialize(&self, path: &Path, cancel: &CancellationToken) -> InitializeOutcome {
        let ctx = RequestContext::for_op("initialize");
        let start = Instant::now();
        log_op_start!(
            ctx.op,
            request_id = ctx.request_id.as_str(),
            path = %path.display()
        );

        let result = self.initialize_inner(path, cancel).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(snapshot) => {
                let warning_count = self.state.read().await.warnings.len();
                log_op_end!(
                    ctx.op,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str(),
                    snapshot_version = snapshot.version(),
                    module_count = snapshot.module_count(),
                    warning_count = warning_count
                );
                InitializeOutcome {
                    success: true,
                    message: format!(
                        "Loaded {} module(s) from {} with {} warning(s)",
                        snapshot.module_count(),
                        snapshot.root().display(),
                        warning_count
                    ),
                    module_count: snapshot.module_count(),
                    error_kind: None,
                }
            }
            Err(err) => {
                let err = err.with_request_id(ctx.request_id.clone());
                log_op_error!(
                    ctx.op,
                    err,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str()
                );
                InitializeOutcome::failed(&err)
            }
        }
    }

    async fn initialize_inner(&self, path: &Path, cancel: &CancellationToken) -> Result<Arc<Snapshot>> {
        let load_token = cancel.child_token();
        let loaded = bounded(
            "initialize",
            self.config.timeouts.init(),
            cancel,
            self.load_exclusive(path, &load_token),
        )
        .await;
        // Stops a loader still running on a blocking thread after expiry
        load_token.cancel();

        let (exclusive, version, graph) = loaded.map_err(|err| match err.kind() {
            ExErrorKind::Timeout => ExError::new(ExErrorKind::LoadTimeout)
                .with_op("initialize")
                .with_path(path)
                .with_message(err.message().to_string()),
            ExErrorKind::Cancelled | ExErrorKind::LoadCancelled => {
                ExError::new(ExErrorKind::LoadCancelled)
                    .with_op("initialize")
                    .with_path(path)
                    .with_message("project load cancelled")
            }
            _ => err,
        })?;

        let snapshot = Arc::new(Snapshot::new(version, graph.root, graph.modules));
        let mut state = self.state.write().await;
        state.snapshot = Some(snapshot.clone());
        state.warnings = graph.warnings;
        state.last_version = version;
        drop(state);
        drop(exclusive);
        Ok(snapshot)
    }

    /// Take the exclusive mutex, discard the current state and load the graph.
    ///
    /// Returns the mutex guard so the caller publishes before releasing it.
    async fn load_exclusive(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<(MutexGuard<'_, ()>, u64, ProjectGraph)> {
        let exclusive = self.exclusive.lock().await;
        let version = {
            let mut state = self.state.write().await;
            let version = state.last_version + 1;
            state.snapshot = None;
            state.warnings.clear();
            self.cache.lock().await.invalidate(version);
            version
        };

        let root = resolve_root(path, &self.config.layout)?;
        let graph = self.engine.load(&root, cancel).await?;
        Ok((exclusive, version, graph))
    }
}
