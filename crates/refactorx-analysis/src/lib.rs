//! refactorx analysis - the built-in analysis engine
//!
//! A shallow, line-oriented engine that makes the workspace usable without an
//! external compiler:
//! - `FsAnalysisEngine` loads projects from disk and reports hygiene diagnostics
//! - `builtin_registry` is the static provider registration table

pub mod engine;
pub mod hygiene;
pub mod providers;

pub use engine::FsAnalysisEngine;
pub use providers::builtin_registry;
