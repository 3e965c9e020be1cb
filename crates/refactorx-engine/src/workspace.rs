//! The workspace handle.
//!
//! One handle per process, shared as `Arc<Workspace>`. Structural operations
//! (initialize, commit) hold the exclusive mutex for their whole duration, so
//! they never interleave. The state lock itself is only held to clone or swap
//! the current `Arc<Snapshot>`; nobody awaits other work while holding it.
//! The action cache sits behind its own mutex and is only ever locked after
//! the state lock, never before. Every wait for the exclusive mutex or the
//! state lock runs inside the caller's budget.

use crate::analysis::AnalysisEngine;
use crate::bounded::bounded;
use refactorx_core::cache::ActionCache;
use refactorx_core::config::RefactorxConfig;
use refactorx_core::decompile::{Decompiler, NoDecompiler};
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::Snapshot;
use refactorx_core::provider::ProviderRegistry;
use refactorx_store::{CommandDecompiler, DocumentSink, FsDocumentSink, LoadWarning};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub(crate) struct WorkspaceState {
    pub(crate) snapshot: Option<Arc<Snapshot>>,
    pub(crate) warnings: Vec<LoadWarning>,
    /// Highest version ever published; survives re-initialization
    pub(crate) last_version: u64,
}

pub struct Workspace {
    pub(crate) engine: Arc<dyn AnalysisEngine>,
    pub(crate) providers: ProviderRegistry,
    pub(crate) sink: Arc<dyn DocumentSink>,
    pub(crate) decompiler: Arc<dyn Decompiler>,
    pub(crate) config: RefactorxConfig,
    /// Held by initialize and commit from start to publish
    pub(crate) exclusive: Mutex<()>,
    pub(crate) state: RwLock<WorkspaceState>,
    pub(crate) cache: Mutex<ActionCache>,
}

impl Workspace {
    /// Create an uninitialized workspace.
    ///
    /// Documents are persisted to the local filesystem and source recovery
    /// uses the configured decompiler program, if any.
    pub fn new(
        engine: Arc<dyn AnalysisEngine>,
        providers: ProviderRegistry,
        config: RefactorxConfig,
    ) -> Self {
        let decompiler: Arc<dyn Decompiler> = match CommandDecompiler::from_config(&config.decompiler)
        {
            Some(command) => Arc::new(command),
            None => Arc::new(NoDecompiler),
        };
        Self {
            engine,
            providers,
            sink: Arc::new(FsDocumentSink),
            decompiler,
            config,
            exclusive: Mutex::new(()),
            state: RwLock::new(WorkspaceState::default()),
            cache: Mutex::new(ActionCache::default()),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DocumentSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_decompiler(mut self, decompiler: Arc<dyn Decompiler>) -> Self {
        self.decompiler = decompiler;
        self
    }

    pub fn config(&self) -> &RefactorxConfig {
        &self.config
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.snapshot.is_some()
    }

    /// The latest published snapshot
    pub async fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// Warnings retained from the last successful load
    pub async fn load_warnings(&self) -> Vec<LoadWarning> {
        self.state.read().await.warnings.clone()
    }

    /// Clone the current snapshot within `budget`, or fail with
    /// `WorkspaceNotInitialized`
    pub(crate) async fn require_snapshot(
        &self,
        op: &'static str,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<Arc<Snapshot>> {
        let snapshot = bounded(op, budget, cancel, async { Ok(self.current_snapshot().await) }).await?;
        snapshot.ok_or_else(|| not_initialized(op))
    }
}

pub(crate) fn not_initialized(op: &'static str) -> ExError {
    ExError::new(ExErrorKind::WorkspaceNotInitialized)
        .with_op(op)
        .with_message("workspace has not been initialized")
}
