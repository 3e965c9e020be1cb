//! Source recovery for external symbols.

use crate::bounded::bounded;
use crate::workspace::Workspace;
use refactorx_core::decompile::{DecompilationFallback, DecompiledText};
use refactorx_core::errors::Result;
use refactorx_core::{log_op_end, log_op_error, log_op_start};
use refactorx_core_types::correlation::RequestContext;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

impl Workspace {
    /// Best-effort source text for a type defined outside the workspace.
    ///
    /// Never fails: an unknown symbol, a missing artifact, a decompiler
    /// failure or an uninitialized workspace all yield `None`.
    pub async fn recover_external_source(
        &self,
        symbol: &str,
        include_implementation: bool,
        cancel: &CancellationToken,
    ) -> Option<DecompiledText> {
        let ctx = RequestContext::for_op("recover_external_source");
        let start = Instant::now();
        log_op_start!(ctx.op, request_id = ctx.request_id.as_str(), symbol = symbol);

        let result = self
            .try_recover_external_source(symbol, include_implementation, cancel)
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                log_op_end!(
                    ctx.op,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str(),
                    warning_count = text.warnings.len()
                );
                Some(text)
            }
            Err(err) => {
                let err = err.with_request_id(ctx.request_id.clone());
                log_op_error!(
                    ctx.op,
                    err,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str()
                );
                None
            }
        }
    }

    /// Same as [`Workspace::recover_external_source`] with the failure kept.
    ///
    /// # Errors
    ///
    /// `WorkspaceNotInitialized`, `DecompilationUnavailable`,
    /// `Timeout`/`Cancelled`.
    pub async fn try_recover_external_source(
        &self,
        symbol: &str,
        include_implementation: bool,
        cancel: &CancellationToken,
    ) -> Result<DecompiledText> {
        let snapshot = self
            .require_snapshot("recover_external_source", self.config.timeouts.query(), cancel)
            .await?;
        let symbols = self.engine.symbol_table();
        let fallback = DecompilationFallback::new(symbols.as_ref(), self.decompiler.as_ref());

        // Dropping the recovery on timeout or cancel also drops the decompiler call.
        bounded(
            "recover_external_source",
            self.config.timeouts.query(),
            cancel,
            fallback.try_recover(&snapshot, symbol, include_implementation),
        )
        .await
    }
}
