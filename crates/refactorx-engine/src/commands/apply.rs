//! Transformation applier.
//!
//! Preview realizes a cached action and reports the change set without side
//! effects. Commit does the same while holding the workspace's exclusive
//! mutex, persists each file change through the document sink, then publishes
//! the successor snapshot and invalidates the cache in the same state-lock
//! critical section.
//!
//! Persistence is not transactional. When a write fails part way, the files
//! already written stay written and the published snapshot covers exactly
//! those files, so memory and storage agree.

use crate::bounded::{bounded, join_error};
use crate::workspace::{not_initialized, Workspace};
use refactorx_core::edits::{plan_changes, to_change_set, PlannedChange};
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::{CachedAction, ChangeSet, Snapshot};
use refactorx_core::{log_op_end, log_op_error, log_op_start};
use refactorx_core_types::correlation::RequestContext;
use refactorx_store::DocumentSink;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Compute the change set only
    Preview,
    /// Persist the change set and publish the next snapshot
    Commit,
}

/// Result of [`Workspace::apply_action`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    pub changes: ChangeSet,
    #[serde(skip)]
    pub error_kind: Option<ExErrorKind>,
    /// Snapshot version published by a commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_version: Option<u64>,
}

impl ApplyOutcome {
    fn succeeded(changes: ChangeSet, snapshot_version: Option<u64>) -> Self {
        Self {
            success: true,
            error_message: None,
            error_code: None,
            changes,
            error_kind: None,
            snapshot_version,
        }
    }

    fn failed(err: &ExError, changes: ChangeSet) -> Self {
        Self {
            success: false,
            error_message: Some(err.message().to_string()),
            error_code: Some(err.code()),
            changes,
            error_kind: Some(err.kind()),
            // a partial commit still publishes what it wrote
            snapshot_version: err
                .snapshot_version()
                .filter(|_| err.kind() == ExErrorKind::ApplyPartialFailure),
        }
    }
}

/// A commit that wrote only part of its change set
struct PartialCommit {
    persisted: Vec<PlannedChange>,
    error: ExError,
}

impl Workspace {
    /// Realize a cached action and either preview or commit its changes.
    ///
    /// Failures are reported in the outcome; the snapshot and storage are
    /// untouched unless at least one file was persisted.
    pub async fn apply_action(
        &self,
        action_id: &str,
        mode: ApplyMode,
        cancel: &CancellationToken,
    ) -> ApplyOutcome {
        let ctx = RequestContext::for_op("apply_action");
        let start = Instant::now();
        log_op_start!(
            ctx.op,
            request_id = ctx.request_id.as_str(),
            action_id = action_id,
            mode = ?mode
        );

        let outcome = match mode {
            ApplyMode::Preview => self.preview(action_id, cancel).await,
            ApplyMode::Commit => self.commit(action_id, cancel).await,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(outcome) => {
                log_op_end!(
                    ctx.op,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str(),
                    action_id = action_id,
                    change_count = outcome.changes.len()
                );
                outcome
            }
            Err((err, changes)) => {
                let err = err
                    .with_action_id(action_id)
                    .with_request_id(ctx.request_id.clone());
                log_op_error!(
                    ctx.op,
                    err,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str()
                );
                ApplyOutcome::failed(&err, changes)
            }
        }
    }

    async fn preview(
        &self,
        action_id: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<ApplyOutcome, (ExError, ChangeSet)> {
        let planned = bounded("apply_action", self.config.timeouts.apply(), cancel, async {
            let snapshot = self
                .current_snapshot()
                .await
                .ok_or_else(|| not_initialized("apply_action"))?;
            let cached = self.lookup_current(action_id, &snapshot).await?;
            realize_and_plan(cached, snapshot).await
        })
        .await
        .map_err(|e| (e, ChangeSet::default()))?;

        Ok(ApplyOutcome::succeeded(to_change_set(&planned), None))
    }

    async fn commit(
        &self,
        action_id: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<ApplyOutcome, (ExError, ChangeSet)> {
        let (exclusive, snapshot, planned) =
            bounded("apply_action", self.config.timeouts.apply(), cancel, async {
                let exclusive = self.exclusive.lock().await;
                let snapshot = self
                    .current_snapshot()
                    .await
                    .ok_or_else(|| not_initialized("apply_action"))?;
                let cached = self.lookup_current(action_id, &snapshot).await?;
                let planned = realize_and_plan(cached, snapshot.clone()).await?;
                Ok((exclusive, snapshot, planned))
            })
            .await
            .map_err(|e| (e, ChangeSet::default()))?;

        // Past this point the commit runs to completion: a write that has
        // started is never abandoned half way by a timeout.
        let sink = self.sink.clone();
        let total = planned.len();
        let persisted = tokio::task::spawn_blocking(move || persist(sink.as_ref(), planned))
            .await
            .map_err(|e| (join_error("apply_action", e), ChangeSet::default()))?;

        let (persisted, failure) = match persisted {
            Ok(all) => (all, None),
            Err(partial) => (partial.persisted, Some(partial.error)),
        };
        let changes = to_change_set(&persisted);

        if persisted.is_empty() {
            // Nothing reached storage, so this is the sink's failure, not a partial commit
            let cause = failure.unwrap_or_else(|| {
                ExError::new(ExErrorKind::Internal).with_message("commit persisted nothing")
            });
            return Err((commit_failure(cause.kind(), 0, total, &cause), changes));
        }

        let next = Arc::new(snapshot.successor(&persisted));
        let version = next.version();
        let mut state = self.state.write().await;
        state.snapshot = Some(next);
        state.last_version = version;
        self.cache.lock().await.invalidate(version);
        drop(state);
        drop(exclusive);

        tracing::info!(
            snapshot_version = version,
            change_count = persisted.len(),
            "published snapshot"
        );

        match failure {
            None => Ok(ApplyOutcome::succeeded(changes, Some(version))),
            Some(err) => {
                let err = commit_failure(ExErrorKind::ApplyPartialFailure, persisted.len(), total, &err)
                    .with_snapshot_version(version);
                Err((err, changes))
            }
        }
    }

    /// Lookup that also rejects ids cached against another snapshot
    async fn lookup_current(&self, action_id: &str, snapshot: &Snapshot) -> Result<CachedAction> {
        let cache = self.cache.lock().await;
        let cached = cache.lookup(action_id)?;
        if cached.version != snapshot.version() {
            return Err(ExError::new(ExErrorKind::ActionNotFound)
                .with_op("apply_action")
                .with_snapshot_version(snapshot.version())
                .with_message("action id belongs to an earlier snapshot"));
        }
        Ok(cached.clone())
    }
}

/// Realize on a blocking thread and resolve the edits into file changes
async fn realize_and_plan(cached: CachedAction, snapshot: Arc<Snapshot>) -> Result<Vec<PlannedChange>> {
    tokio::task::spawn_blocking(move || {
        let edits = cached.action.realize(&snapshot).map_err(|e| {
            ExError::new(ExErrorKind::RealizationFailed)
                .with_op("apply_action")
                .with_message(format!("'{}': {}", cached.action.title, e.message()))
        })?;
        if edits.is_empty() {
            return Err(no_changes(&cached));
        }
        let planned = plan_changes(&snapshot, &edits)?;
        if planned.is_empty() {
            return Err(no_changes(&cached));
        }
        Ok(planned)
    })
    .await
    .map_err(|e| {
        let err = join_error("apply_action", e);
        ExError::new(ExErrorKind::RealizationFailed)
            .with_op("apply_action")
            .with_message(format!("realization {}", err.message()))
    })?
}

fn no_changes(cached: &CachedAction) -> ExError {
    ExError::new(ExErrorKind::RealizationFailed)
        .with_op("apply_action")
        .with_message(format!("'{}' produced no changes", cached.action.title))
}

/// Persist changes in order, stopping at the first failure
fn persist(
    sink: &dyn DocumentSink,
    planned: Vec<PlannedChange>,
) -> std::result::Result<Vec<PlannedChange>, PartialCommit> {
    let mut persisted = Vec::with_capacity(planned.len());
    for change in planned {
        let path = change.change.path.as_path();
        let written = match &change.change.modified_text {
            Some(text) => sink.write(path, text),
            None => sink.remove(path),
        };
        if let Err(error) = written {
            return Err(PartialCommit { persisted, error });
        }
        persisted.push(change);
    }
    Ok(persisted)
}

fn commit_failure(kind: ExErrorKind, written: usize, total: usize, cause: &ExError) -> ExError {
    let mut err = ExError::new(kind)
        .with_op("apply_action")
        .with_message(format!(
            "wrote {written} of {total} file(s) before failing: {}",
            cause.message()
        ));
    if let Some(path) = cause.path() {
        err = err.with_path(path);
    }
    err
}
