//! Versioned, immutable view of the module/document graph.

use crate::edits::PlannedChange;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A source document inside a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// A compiled artifact referenced by a module
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Reference {
    pub path: PathBuf,
}

impl Reference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Assembly identity: the artifact's file stem (`lib/Newtonsoft.Json.dll` → `Newtonsoft.Json`)
    pub fn identity(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// A compilation unit: ordered documents plus external references
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    /// Path of the module definition file
    pub path: PathBuf,
    pub documents: Vec<Document>,
    pub references: BTreeSet<Reference>,
}

impl Module {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            documents: Vec::new(),
            references: BTreeSet::new(),
        }
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.insert(reference);
        self
    }

    pub fn document(&self, path: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| d.path == path)
    }

    /// Reference whose assembly identity equals `identity` (case-insensitive)
    pub fn reference_for(&self, identity: &str) -> Option<&Reference> {
        self.references.iter().find(|r| {
            r.identity()
                .map(|id| id.eq_ignore_ascii_case(identity))
                .unwrap_or(false)
        })
    }
}

/// Immutable graph of modules at one version
///
/// A published snapshot is never mutated; [`Snapshot::successor`] derives the
/// next version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    version: u64,
    root: PathBuf,
    modules: Vec<Module>,
}

impl Snapshot {
    pub fn new(version: u64, root: impl Into<PathBuf>, modules: Vec<Module>) -> Self {
        Self {
            version,
            root: root.into(),
            modules,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Root definition file the graph was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing the root definition file
    pub fn root_dir(&self) -> &Path {
        self.root.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Find a document and its owning module
    pub fn document(&self, path: &Path) -> Option<(&Module, &Document)> {
        self.modules
            .iter()
            .find_map(|m| m.document(path).map(|d| (m, d)))
    }

    /// All documents in module order, then document order
    pub fn documents(&self) -> impl Iterator<Item = (&Module, &Document)> {
        self.modules
            .iter()
            .flat_map(|m| m.documents.iter().map(move |d| (m, d)))
    }

    /// Path relative to the root directory when possible, for display
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(self.root_dir()).unwrap_or(path)
    }

    /// Derive the next snapshot (version + 1) by applying resolved changes to
    /// the in-memory graph.
    ///
    /// Changes are expected to come from [`crate::edits::plan_changes`] over
    /// this snapshot; a change naming an unknown module is ignored.
    pub fn successor(&self, changes: &[PlannedChange]) -> Snapshot {
        let mut modules = self.modules.clone();

        for planned in changes {
            let change = &planned.change;
            let Some(module) = modules.iter_mut().find(|m| m.name == planned.module) else {
                continue;
            };
            let existing = module.documents.iter().position(|d| d.path == change.path);

            match (existing, &change.modified_text) {
                (Some(idx), Some(text)) => module.documents[idx].text = text.clone(),
                (Some(idx), None) => {
                    module.documents.remove(idx);
                }
                (None, Some(text)) => module
                    .documents
                    .push(Document::new(change.path.clone(), text.clone())),
                (None, None) => {}
            }
        }

        Snapshot {
            version: self.version + 1,
            root: self.root.clone(),
            modules,
        }
    }
}
