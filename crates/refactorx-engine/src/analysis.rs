//! Seam to the semantic-analysis engine.

use async_trait::async_trait;
use refactorx_core::decompile::SymbolTable;
use refactorx_core::errors::Result;
use refactorx_core::model::{Diagnostic, Snapshot};
use refactorx_store::ProjectGraph;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Loads project graphs and computes diagnostics over snapshots
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Load the graph rooted at a resolved definition file.
    ///
    /// Implementations should stop early once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Fatal load failures only; structural problems belong in the graph's
    /// warnings.
    async fn load(&self, root: &Path, cancel: &CancellationToken) -> Result<ProjectGraph>;

    /// Diagnostics for every document in `snapshot`, in any order.
    ///
    /// # Errors
    ///
    /// Engine failures; the workspace reports them to the caller unchanged.
    async fn diagnostics(&self, snapshot: &Snapshot) -> Result<Vec<Diagnostic>>;

    /// External symbol metadata for source recovery
    fn symbol_table(&self) -> Arc<dyn SymbolTable>;
}
