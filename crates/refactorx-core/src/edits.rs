//! Document edits and change set construction.
//!
//! Providers realize an action into a list of [`DocumentEdit`]s. This module
//! resolves those edits against a snapshot into one [`PlannedChange`] per
//! affected document, in first-touch order, and renders the caller-facing
//! [`ChangeSet`] with unified diffs.

use crate::errors::EditError;
use crate::model::{ChangeSet, FileChange, Snapshot};
use similar::TextDiff;
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Replace a byte range of a document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range, "")
    }
}

/// A document-level edit produced by realizing an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEdit {
    /// Replace the full text of an existing document
    Update { path: PathBuf, text: String },
    /// Create a new document in the named module
    Add {
        module: String,
        path: PathBuf,
        text: String,
    },
    /// Remove an existing document
    Remove { path: PathBuf },
    /// Apply non-overlapping byte-range edits to an existing document
    Splice { path: PathBuf, edits: Vec<TextEdit> },
}

impl DocumentEdit {
    pub fn path(&self) -> &Path {
        match self {
            DocumentEdit::Update { path, .. }
            | DocumentEdit::Add { path, .. }
            | DocumentEdit::Remove { path }
            | DocumentEdit::Splice { path, .. } => path,
        }
    }
}

/// A resolved change to one document, with its owning module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub module: String,
    pub change: FileChange,
}

/// Apply text edits to `text`.
///
/// Edits are ordered by start offset (stable for equal starts, so several
/// inserts at one position keep their given order) and must not overlap.
///
/// # Errors
///
/// `RangeOutOfBounds`, `NotCharBoundary` or `OverlappingEdits`.
pub fn apply_text_edits(path: &Path, text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.range.start, e.range.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for edit in ordered {
        let Range { start, end } = edit.range;
        if start > end || end > text.len() {
            return Err(EditError::RangeOutOfBounds {
                path: path.to_path_buf(),
                start,
                end,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary {
                path: path.to_path_buf(),
                start,
                end,
            });
        }
        if start < cursor {
            return Err(EditError::OverlappingEdits {
                path: path.to_path_buf(),
                at: start,
            });
        }
        out.push_str(&text[cursor..start]);
        out.push_str(&edit.replacement);
        cursor = end;
    }

    out.push_str(&text[cursor..]);
    Ok(out)
}

struct WorkingDocument {
    path: PathBuf,
    module: String,
    original: Option<String>,
    current: Option<String>,
}

/// Resolve provider edits against `snapshot` into per-document changes.
///
/// Several edits may touch the same document; they compose in order. A
/// document whose final text equals its original text produces no change.
///
/// # Errors
///
/// Returns an [`EditError`] when an edit does not fit the snapshot (unknown
/// document or module, duplicate add, edit after remove, a removed document
/// re-added to another module, bad text range).
pub fn plan_changes(
    snapshot: &Snapshot,
    edits: &[DocumentEdit],
) -> Result<Vec<PlannedChange>, EditError> {
    let mut working: Vec<WorkingDocument> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    // Look up (or start tracking) an existing snapshot document.
    fn touch_existing(
        snapshot: &Snapshot,
        working: &mut Vec<WorkingDocument>,
        index: &mut HashMap<PathBuf, usize>,
        path: &Path,
    ) -> Result<usize, EditError> {
        if let Some(&idx) = index.get(path) {
            return Ok(idx);
        }
        let (module, doc) = snapshot
            .document(path)
            .ok_or_else(|| EditError::DocumentNotFound {
                path: path.to_path_buf(),
            })?;
        working.push(WorkingDocument {
            path: path.to_path_buf(),
            module: module.name.clone(),
            original: Some(doc.text.clone()),
            current: Some(doc.text.clone()),
        });
        index.insert(path.to_path_buf(), working.len() - 1);
        Ok(working.len() - 1)
    }

    for edit in edits {
        match edit {
            DocumentEdit::Update { path, text } => {
                let idx = touch_existing(snapshot, &mut working, &mut index, path)?;
                let doc = &mut working[idx];
                if doc.current.is_none() {
                    return Err(EditError::EditAfterRemove { path: path.clone() });
                }
                doc.current = Some(text.clone());
            }
            DocumentEdit::Splice { path, edits } => {
                let idx = touch_existing(snapshot, &mut working, &mut index, path)?;
                let doc = &mut working[idx];
                let current = doc
                    .current
                    .as_deref()
                    .ok_or_else(|| EditError::EditAfterRemove { path: path.clone() })?;
                doc.current = Some(apply_text_edits(path, current, edits)?);
            }
            DocumentEdit::Remove { path } => {
                let idx = touch_existing(snapshot, &mut working, &mut index, path)?;
                let doc = &mut working[idx];
                if doc.current.is_none() {
                    return Err(EditError::DocumentNotFound { path: path.clone() });
                }
                doc.current = None;
            }
            DocumentEdit::Add { module, path, text } => {
                if snapshot.module(module).is_none() {
                    return Err(EditError::ModuleNotFound {
                        module: module.clone(),
                    });
                }
                let tracked = index.get(path.as_path()).copied();
                match tracked {
                    Some(idx) => {
                        let doc = &mut working[idx];
                        if doc.current.is_some() {
                            return Err(EditError::DocumentExists { path: path.clone() });
                        }
                        // one change per path cannot express leaving one module for another
                        if doc.module != *module {
                            return Err(EditError::CrossModuleMove {
                                path: path.clone(),
                                from: doc.module.clone(),
                                to: module.clone(),
                            });
                        }
                        doc.current = Some(text.clone());
                    }
                    None => {
                        if snapshot.document(path).is_some() {
                            return Err(EditError::DocumentExists { path: path.clone() });
                        }
                        working.push(WorkingDocument {
                            path: path.clone(),
                            module: module.clone(),
                            original: None,
                            current: Some(text.clone()),
                        });
                        index.insert(path.clone(), working.len() - 1);
                    }
                }
            }
        }
    }

    Ok(working
        .into_iter()
        .filter(|doc| doc.original != doc.current)
        .map(|doc| {
            let unified_diff = Some(unified_diff(
                snapshot.display_path(&doc.path),
                doc.original.as_deref(),
                doc.current.as_deref(),
            ));
            PlannedChange {
                module: doc.module,
                change: FileChange {
                    path: doc.path,
                    original_text: doc.original,
                    modified_text: doc.current,
                    unified_diff,
                },
            }
        })
        .collect())
}

/// Caller-facing change set for planned changes
pub fn to_change_set(planned: &[PlannedChange]) -> ChangeSet {
    ChangeSet::new(planned.iter().map(|p| p.change.clone()).collect())
}

/// Unified diff with `a/` and `b/` headers; a missing side is `/dev/null`
pub fn unified_diff(display_path: &Path, original: Option<&str>, modified: Option<&str>) -> String {
    let old_header = match original {
        Some(_) => format!("a/{}", display_path.display()),
        None => "/dev/null".to_string(),
    };
    let new_header = match modified {
        Some(_) => format!("b/{}", display_path.display()),
        None => "/dev/null".to_string(),
    };
    TextDiff::from_lines(original.unwrap_or(""), modified.unwrap_or(""))
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string()
}
