//! Candidate and cached actions.

use crate::edits::DocumentEdit;
use crate::errors::Result;
use crate::model::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Whether an action fixes diagnostics or refactors at a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fix,
    Refactor,
}

/// Deferred computation of an action's document edits
///
/// Implementations receive the snapshot the action was discovered against and
/// may run whatever targeted analysis they need to produce concrete edits.
pub trait Realize: Send + Sync {
    /// # Errors
    ///
    /// Any error is reported to the caller as `RealizationFailed`.
    fn realize(&self, snapshot: &Snapshot) -> Result<Vec<DocumentEdit>>;
}

impl<F> Realize for F
where
    F: Fn(&Snapshot) -> Result<Vec<DocumentEdit>> + Send + Sync,
{
    fn realize(&self, snapshot: &Snapshot) -> Result<Vec<DocumentEdit>> {
        self(snapshot)
    }
}

/// An unrealized, titled suggestion produced by a provider
#[derive(Clone)]
pub struct CandidateAction {
    pub title: String,
    pub kind: ActionKind,
    pub diagnostic_ids: Vec<String>,
    /// Name of the provider that proposed the action
    pub provider: String,
    realize: Arc<dyn Realize>,
}

impl CandidateAction {
    pub fn new(
        title: impl Into<String>,
        kind: ActionKind,
        diagnostic_ids: Vec<String>,
        realize: impl Realize + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            kind,
            diagnostic_ids,
            provider: String::new(),
            realize: Arc::new(realize),
        }
    }

    /// A fix for the given diagnostic ids
    pub fn fix<I, S>(title: impl Into<String>, diagnostic_ids: I, realize: impl Realize + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            title,
            ActionKind::Fix,
            diagnostic_ids.into_iter().map(Into::into).collect(),
            realize,
        )
    }

    /// A context refactoring, not tied to diagnostics
    pub fn refactor(title: impl Into<String>, realize: impl Realize + 'static) -> Self {
        Self::new(title, ActionKind::Refactor, Vec::new(), realize)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// # Errors
    ///
    /// Propagates the provider's realization error.
    pub fn realize(&self, snapshot: &Snapshot) -> Result<Vec<DocumentEdit>> {
        self.realize.realize(snapshot)
    }

    /// Carries at least one diagnostic id from the priority set
    pub fn is_priority(&self, priority_ids: &BTreeSet<String>) -> bool {
        self.diagnostic_ids.iter().any(|id| priority_ids.contains(id))
    }
}

impl fmt::Debug for CandidateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateAction")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("diagnostic_ids", &self.diagnostic_ids)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// A candidate registered in the action cache under an opaque id
#[derive(Debug, Clone)]
pub struct CachedAction {
    pub id: String,
    pub action: CandidateAction,
    /// Snapshot version at discovery time
    pub version: u64,
}

impl CachedAction {
    pub fn summary(&self) -> ActionSummary {
        ActionSummary {
            id: self.id.clone(),
            title: self.action.title.clone(),
            kind: self.action.kind,
            diagnostic_ids: self.action.diagnostic_ids.clone(),
        }
    }
}

/// Caller-facing description of a cached action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    pub id: String,
    pub title: String,
    pub kind: ActionKind,
    pub diagnostic_ids: Vec<String>,
}
