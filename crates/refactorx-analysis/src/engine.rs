//! Filesystem-backed analysis engine.

use crate::hygiene;
use async_trait::async_trait;
use refactorx_core::config::ProjectLayout;
use refactorx_core::decompile::{EmptySymbolTable, SymbolTable};
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::{Diagnostic, Snapshot};
use refactorx_engine::AnalysisEngine;
use refactorx_store::{load_project, ProjectGraph};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Loads projects with the store loader and reports hygiene diagnostics.
///
/// It has no metadata reader, so source recovery always comes back empty.
#[derive(Debug, Clone, Default)]
pub struct FsAnalysisEngine {
    layout: ProjectLayout,
}

impl FsAnalysisEngine {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }
}

#[async_trait]
impl AnalysisEngine for FsAnalysisEngine {
    async fn load(&self, root: &Path, cancel: &CancellationToken) -> Result<ProjectGraph> {
        let root = root.to_path_buf();
        let layout = self.layout.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || load_project(&root, &layout, &cancel))
            .await
            .map_err(|e| {
                ExError::new(ExErrorKind::EngineFault)
                    .with_op("load_project")
                    .with_message(format!("loader task failed: {e}"))
            })?
    }

    async fn diagnostics(&self, snapshot: &Snapshot) -> Result<Vec<Diagnostic>> {
        let diagnostics = hygiene::analyze(snapshot);
        tracing::debug!(
            snapshot_version = snapshot.version(),
            diagnostic_count = diagnostics.len(),
            "computed hygiene diagnostics"
        );
        Ok(diagnostics)
    }

    fn symbol_table(&self) -> Arc<dyn SymbolTable> {
        Arc::new(EmptySymbolTable)
    }
}
