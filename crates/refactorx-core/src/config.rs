//! Static configuration consumed by the workspace.
//!
//! Loaded once (TOML) and handed to `Workspace::new` by value; nothing reads
//! it from ambient state.

use crate::errors::{ExError, ExErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Default cap on curated actions per discovery call
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Curation policy applied to raw candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurationConfig {
    pub max_results: usize,
    pub excluded_diagnostic_ids: BTreeSet<String>,
    pub excluded_refactor_title_patterns: BTreeSet<String>,
    pub include_refactorings: bool,
    /// Ids that bypass exclusion and survive truncation first
    pub priority_diagnostic_ids: BTreeSet<String>,
    pub deduplicate_by_title: bool,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            excluded_diagnostic_ids: BTreeSet::new(),
            excluded_refactor_title_patterns: BTreeSet::new(),
            include_refactorings: true,
            priority_diagnostic_ids: BTreeSet::new(),
            deduplicate_by_title: true,
        }
    }
}

/// Per-operation budgets, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutConfig {
    pub init_secs: u64,
    pub query_secs: u64,
    pub apply_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            init_secs: 300,
            query_secs: 30,
            apply_secs: 120,
        }
    }
}

impl TimeoutConfig {
    pub fn init(&self) -> Duration {
        Duration::from_secs(self.init_secs)
    }

    pub fn query(&self) -> Duration {
        Duration::from_secs(self.query_secs)
    }

    pub fn apply(&self) -> Duration {
        Duration::from_secs(self.apply_secs)
    }
}

/// File naming conventions for project discovery and loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectLayout {
    /// Extensions of multi-module root definition files
    pub root_extensions: Vec<String>,
    /// Extensions of single-module definition files
    pub module_extensions: Vec<String>,
    /// Extensions of source documents inside a module directory
    pub source_extensions: Vec<String>,
    /// Directory names never descended into when collecting documents
    pub excluded_dirs: Vec<String>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            root_extensions: vec!["sln".to_string()],
            module_extensions: vec!["csproj".to_string()],
            source_extensions: vec!["cs".to_string()],
            excluded_dirs: vec!["bin".to_string(), "obj".to_string()],
        }
    }
}

impl ProjectLayout {
    pub fn is_root_file(&self, path: &Path) -> bool {
        has_extension(path, &self.root_extensions)
    }

    pub fn is_module_file(&self, path: &Path) -> bool {
        has_extension(path, &self.module_extensions)
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        has_extension(path, &self.source_extensions)
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded_dirs.iter().any(|d| d == name)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// External decompiler invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecompilerConfig {
    /// Program to run; recovery is unavailable when unset
    pub program: Option<String>,
    /// Extra argument passed when method bodies are not wanted
    pub signatures_only_flag: Option<String>,
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefactorxConfig {
    pub curation: CurationConfig,
    pub timeouts: TimeoutConfig,
    pub layout: ProjectLayout,
    pub decompiler: DecompilerConfig,
}

impl RefactorxConfig {
    /// Parse a TOML document; missing sections and keys take defaults.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the document is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_config")
                .with_message(e.to_string())
        })
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, `InvalidInput` when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_path(path)
                .with_message(e.to_string())
        })?;
        Self::from_toml_str(&text).map_err(|e| e.with_path(path))
    }
}
