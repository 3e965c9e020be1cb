//! Domain model: snapshots, diagnostics, actions and change sets.

pub mod action;
pub mod changeset;
pub mod diagnostic;
pub mod snapshot;

pub use action::{ActionKind, ActionSummary, CachedAction, CandidateAction, Realize};
pub use changeset::{ChangeSet, FileChange, FileChangeKind};
pub use diagnostic::{sort_diagnostics, Diagnostic, LineSpan, Severity, SourceLocation};
pub use snapshot::{Document, Module, Reference, Snapshot};
