//! refactorx store - the filesystem side of the workspace
//!
//! Provides:
//! - Project root resolution from a file or directory path
//! - Project graph loading (root file → module files → documents and references)
//! - Atomic temp→rename writes and the `DocumentSink` used by commits
//! - A decompiler adapter that shells out to an external program

pub mod atomic;
pub mod decompiler;
pub mod errors;
pub mod loader;
pub mod resolve;
pub mod sink;

// Re-export key types
pub use decompiler::CommandDecompiler;
pub use errors::Result;
pub use loader::{load_project, LoadWarning, ProjectGraph};
pub use resolve::resolve_root;
pub use sink::{DocumentSink, FsDocumentSink};
