//! refactorx core - snapshot model and action pipeline
//!
//! This crate holds the pure, I/O-free half of the workspace:
//! - Versioned, immutable snapshots of the module/document graph
//! - Diagnostics and candidate actions as reported by external collaborators
//! - The provider catalog (capability-tagged registration table)
//! - Deterministic curation of raw candidates
//! - The version-scoped action cache
//! - Text edit composition and change set construction
//! - The decompilation fallback logic behind the `Decompiler` seam
//! - The error and logging facilities shared by every other crate

pub mod cache;
pub mod config;
pub mod curation;
pub mod decompile;
pub mod edits;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod provider;

pub use refactorx_core_types;

// Re-export commonly used types
pub use cache::ActionCache;
pub use config::{CurationConfig, RefactorxConfig};
pub use curation::curate;
pub use decompile::{DecompilationFallback, DecompiledText, Decompiler, SymbolTable};
pub use edits::{DocumentEdit, TextEdit};
pub use errors::{ExError, ExErrorKind, Result};
pub use model::{
    ActionKind, CachedAction, CandidateAction, ChangeSet, Diagnostic, Document, FileChange,
    Module, Reference, Severity, Snapshot,
};
pub use provider::{ActionProvider, Capability, DiscoveryRequest, ProviderRegistry};
