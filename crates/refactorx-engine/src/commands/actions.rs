//! Action discovery: raw provider candidates → curation → cached ids.

use crate::bounded::{bounded, join_error};
use crate::workspace::Workspace;
use refactorx_core::curation::curate;
use refactorx_core::errors::Result;
use refactorx_core::model::{ActionSummary, Diagnostic, Snapshot, SourceLocation};
use refactorx_core::provider::DiscoveryRequest;
use refactorx_core::{log_op_end, log_op_error, log_op_start};
use refactorx_core_types::correlation::RequestContext;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// What to discover actions for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQuery {
    /// Restrict fixes to diagnostics with these ids
    pub diagnostic_ids: Vec<String>,
    /// Fixes covering this location plus refactorings offered at it
    pub location: Option<SourceLocation>,
}

impl ActionQuery {
    /// Fixes for every current diagnostic
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_diagnostics<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            diagnostic_ids: ids.into_iter().map(Into::into).collect(),
            location: None,
        }
    }

    pub fn at(location: SourceLocation) -> Self {
        Self {
            diagnostic_ids: Vec::new(),
            location: Some(location),
        }
    }

    /// Diagnostics in scope for fix providers
    fn select(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        if !self.diagnostic_ids.is_empty() {
            let ids: BTreeSet<&str> = self.diagnostic_ids.iter().map(String::as_str).collect();
            diagnostics
                .into_iter()
                .filter(|d| ids.contains(d.id.as_str()))
                .collect()
        } else if let Some(location) = &self.location {
            diagnostics.into_iter().filter(|d| d.covers(location)).collect()
        } else {
            diagnostics
        }
    }
}

impl Workspace {
    /// Discover, curate and cache candidate actions.
    ///
    /// Returned ids stay valid until the next structural change. Failing
    /// providers are skipped.
    ///
    /// # Errors
    ///
    /// `WorkspaceNotInitialized`, `Timeout`/`Cancelled`, or a diagnostics
    /// failure from the engine.
    pub async fn list_actions(
        &self,
        query: ActionQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActionSummary>> {
        let ctx = RequestContext::for_op("list_actions");
        let start = Instant::now();
        log_op_start!(ctx.op, request_id = ctx.request_id.as_str());

        let result = match self
            .require_snapshot(ctx.op, self.config.timeouts.query(), cancel)
            .await
        {
            Ok(snapshot) => {
                bounded(
                    ctx.op,
                    self.config.timeouts.query(),
                    cancel,
                    self.discover(snapshot, query),
                )
                .await
            }
            Err(err) => Err(err),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(summaries) => {
                log_op_end!(
                    ctx.op,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str(),
                    action_count = summaries.len()
                );
                Ok(summaries)
            }
            Err(err) => {
                let err = err.with_request_id(ctx.request_id.clone());
                log_op_error!(
                    ctx.op,
                    err,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str()
                );
                Err(err)
            }
        }
    }

    async fn discover(&self, snapshot: Arc<Snapshot>, query: ActionQuery) -> Result<Vec<ActionSummary>> {
        let diagnostics = query.select(self.engine.diagnostics(&snapshot).await?);

        let providers = self.providers.clone();
        let curation = self.config.curation.clone();
        let discovered = snapshot.clone();
        let curated = tokio::task::spawn_blocking(move || {
            let raw = providers.discover(&DiscoveryRequest {
                snapshot: &discovered,
                diagnostics: &diagnostics,
                location: query.location.as_ref(),
            });
            let raw_count = raw.len();
            let curated = curate(raw, &curation);
            tracing::debug!(raw_count, curated_count = curated.len(), "curated actions");
            curated
        })
        .await
        .map_err(|e| join_error("list_actions", e))?;

        let mut cache = self.cache.lock().await;
        Ok(curated
            .into_iter()
            .map(|action| cache.insert(action, snapshot.version()).summary())
            .collect())
    }
}
