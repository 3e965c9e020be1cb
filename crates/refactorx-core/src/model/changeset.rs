//! Per-file before/after records produced by realizing an action.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileChangeKind {
    Added,
    Removed,
    Modified,
}

/// One affected file
///
/// An addition has no original text, a removal has no modified text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    #[serde(rename = "filePath")]
    pub path: PathBuf,
    #[serde(rename = "originalContent", skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(rename = "modifiedContent", skip_serializing_if = "Option::is_none")]
    pub modified_text: Option<String>,
    #[serde(rename = "unifiedDiff", skip_serializing_if = "Option::is_none")]
    pub unified_diff: Option<String>,
}

impl FileChange {
    pub fn kind(&self) -> FileChangeKind {
        match (&self.original_text, &self.modified_text) {
            (None, _) => FileChangeKind::Added,
            (Some(_), None) => FileChangeKind::Removed,
            (Some(_), Some(_)) => FileChangeKind::Modified,
        }
    }
}

/// Ordered list of file changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    pub changes: Vec<FileChange>,
}

impl ChangeSet {
    pub fn new(changes: Vec<FileChange>) -> Self {
        Self { changes }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter()
    }
}
