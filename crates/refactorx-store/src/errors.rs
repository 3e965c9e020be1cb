//! Error handling for refactorx-store
//!
//! Wraps refactorx-core ExError with store-specific helpers

use refactorx_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}

/// Create a root-not-found error
pub fn root_not_found(path: &Path, reason: &str) -> ExError {
    ExError::new(ExErrorKind::RootNotFound)
        .with_op("resolve_root")
        .with_path(path)
        .with_message(reason.to_string())
}

/// Create a load-cancelled error
pub fn load_cancelled(path: &Path) -> ExError {
    ExError::new(ExErrorKind::LoadCancelled)
        .with_op("load_project")
        .with_path(path)
        .with_message("project load cancelled")
}
