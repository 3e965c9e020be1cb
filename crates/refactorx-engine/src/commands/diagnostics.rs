//! Diagnostic query.

use crate::bounded::bounded;
use crate::workspace::Workspace;
use refactorx_core::errors::Result;
use refactorx_core::model::{sort_diagnostics, Diagnostic, Severity};
use refactorx_core::{log_op_end, log_op_error, log_op_start};
use refactorx_core_types::correlation::RequestContext;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

impl Workspace {
    /// Diagnostics for the current snapshot, computed fresh on every call.
    ///
    /// `min_severity` keeps diagnostics at or above the named severity.
    /// Output is ordered by file, position and id.
    ///
    /// # Errors
    ///
    /// `WorkspaceNotInitialized`, `InvalidInput` for an unknown severity,
    /// `Timeout`/`Cancelled`, or the engine's own failure.
    pub async fn list_diagnostics(
        &self,
        min_severity: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let ctx = RequestContext::for_op("list_diagnostics");
        let start = Instant::now();
        log_op_start!(ctx.op, request_id = ctx.request_id.as_str());

        let result = self.list_diagnostics_inner(min_severity, cancel).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(diagnostics) => {
                log_op_end!(
                    ctx.op,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str(),
                    diagnostic_count = diagnostics.len()
                );
                Ok(diagnostics)
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

    async fn list_diagnostics_inner(
        &self,
        min_severity: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let snapshot = self
            .require_snapshot("list_diagnostics", self.config.timeouts.query(), cancel)
            .await?;
        let min_severity = min_severity
            .map(|s| s.parse::<Severity>())
            .transpose()?;

        let mut diagnostics = bounded(
            "list_diagnostics",
            self.config.timeouts.query(),
            cancel,
            self.engine.diagnostics(&snapshot),
        )
        .await?;

        if let Some(min) = min_severity {
            diagnostics.retain(|d| d.severity >= min);
        }
        for diagnostic in &mut diagnostics {
            diagnostic.has_fix = self.providers.covers_diagnostic(&diagnostic.id);
        }
        sort_diagnostics(&mut diagnostics);
        Ok(diagnostics)
    }
}
