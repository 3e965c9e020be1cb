//! Time-budgeted, cancellable execution.

use refactorx_core::errors::{ExError, ExErrorKind, Result};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

/// Run `fut` until it completes, `budget` elapses or `cancel` fires,
/// whichever comes first.
///
/// # Errors
///
/// The future's own error, `Timeout` on expiry, `Cancelled` on cancellation.
pub async fn bounded<T, F>(
    op: &'static str,
    budget: Duration,
    cancel: &CancellationToken,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExError::new(ExErrorKind::Cancelled)
            .with_op(op)
            .with_message("operation cancelled by caller")),
        _ = tokio::time::sleep(budget) => Err(ExError::new(ExErrorKind::Timeout)
            .with_op(op)
            .with_message(format!("operation exceeded its budget of {budget:?}"))),
        result = fut => result,
    }
}

/// Map a failed blocking task to an engine fault
pub(crate) fn join_error(op: &'static str, err: JoinError) -> ExError {
    let message = if err.is_panic() {
        "task panicked".to_string()
    } else {
        err.to_string()
    };
    ExError::new(ExErrorKind::EngineFault)
        .with_op(op)
        .with_message(message)
}
