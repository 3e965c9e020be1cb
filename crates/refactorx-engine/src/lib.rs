//! refactorx engine - orchestration layer
//!
//! Owns the [`Workspace`] handle: the current snapshot, load warnings and the
//! action cache behind one lock, and the five operations callers drive it
//! with. Every operation runs under a time budget combined with the caller's
//! cancellation token.

pub mod analysis;
pub mod bounded;
pub mod commands;
pub mod workspace;

pub use analysis::AnalysisEngine;
pub use commands::actions::ActionQuery;
pub use commands::apply::{ApplyMode, ApplyOutcome};
pub use commands::initialize::InitializeOutcome;
pub use workspace::Workspace;
