//! Built-in action providers and their registration table.
//!
//! Registration order is discovery order: fixes first, then refactorings.

pub mod empty_document;
pub mod final_newline;
pub mod sort_usings;
pub mod trailing_whitespace;

use crate::hygiene::{MISSING_FINAL_NEWLINE, TRAILING_WHITESPACE};
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::{Diagnostic, Document, Snapshot};
use refactorx_core::provider::{Capability, ProviderRegistry};
use std::path::{Path, PathBuf};

pub use empty_document::DeleteEmptyDocument;
pub use final_newline::AddFinalNewline;
pub use sort_usings::SortUsingDirectives;
pub use trailing_whitespace::RemoveTrailingWhitespace;

pub fn builtin_registry() -> ProviderRegistry {
    ProviderRegistry::new()
        .register(Capability::fixes([TRAILING_WHITESPACE]), || {
            RemoveTrailingWhitespace
        })
        .register(Capability::fixes([MISSING_FINAL_NEWLINE]), || AddFinalNewline)
        .register(Capability::Refactors, || SortUsingDirectives)
        .register(Capability::Refactors, || DeleteEmptyDocument)
}

/// Distinct files named by `diagnostics`, in first-seen order
pub(crate) fn affected_files(diagnostics: &[Diagnostic]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for file in diagnostics.iter().filter_map(|d| d.file.as_ref()) {
        if !files.contains(file) {
            files.push(file.clone());
        }
    }
    files
}

/// Root-relative path used in action titles.
///
/// Titles must stay distinct across modules, since curation collapses equal titles.
pub(crate) fn file_label(snapshot: &Snapshot, path: &Path) -> String {
    snapshot.display_path(path).display().to_string()
}

/// Document lookup at realization time; the document may have gone since discovery
pub(crate) fn document<'s>(snapshot: &'s Snapshot, path: &Path) -> Result<&'s Document> {
    snapshot
        .document(path)
        .map(|(_, doc)| doc)
        .ok_or_else(|| {
            ExError::new(ExErrorKind::RealizationFailed)
                .with_path(path)
                .with_message(format!("document {} is not in the snapshot", path.display()))
        })
}
