//! Backing storage for committed changes.

use crate::atomic::atomic_write;
use crate::errors::{io_error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Destination for committed document changes
///
/// Each call persists exactly one document; commits call it once per file
/// change, in change-set order.
pub trait DocumentSink: Send + Sync {
    /// # Errors
    ///
    /// Any error stops the commit at this document.
    fn write(&self, path: &Path, text: &str) -> Result<()>;

    /// # Errors
    ///
    /// Any error stops the commit at this document.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Writes documents to the local filesystem with temp→rename
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDocumentSink;

impl DocumentSink for FsDocumentSink {
    fn write(&self, path: &Path, text: &str) -> Result<()> {
        atomic_write(path, text.as_bytes())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            // already gone is the desired end state
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove_document", path, e)),
        }
    }
}
