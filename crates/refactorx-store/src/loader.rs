//! Project graph loading from the filesystem.
//!
//! A root definition file lists module files; each module file owns the
//! source documents under its directory and declares external references.
//! Only an unreadable root is fatal. Missing modules, unresolvable references
//! and unreadable documents become [`LoadWarning`]s and loading continues.

use crate::errors::{io_error, load_cancelled, Result};
use refactorx_core::config::ProjectLayout;
use refactorx_core::errors::{ExError, ExErrorKind};
use refactorx_core::model::{Document, Module, Reference};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

/// Module entry in a root definition file:
/// `Project("{type-guid}") = "Name", "relative\path.csproj", "{guid}"`
const PROJECT_ENTRY_PATTERN: &str = r#"(?m)^\s*Project\("\{[^}]*\}"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)""#;
const HINT_PATH_PATTERN: &str = r"<HintPath>\s*([^<]+?)\s*</HintPath>";
const REFERENCE_INCLUDE_PATTERN: &str = r#"<Reference\s+Include\s*=\s*"([^"]+)""#;

/// Non-fatal structural problem found while loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadWarning {
    pub path: PathBuf,
    pub message: String,
}

impl LoadWarning {
    fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Loaded modules plus the warnings collected on the way
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    pub root: PathBuf,
    pub modules: Vec<Module>,
    pub warnings: Vec<LoadWarning>,
}

struct Patterns {
    project_entry: Regex,
    hint_path: Regex,
    reference_include: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("load_project")
                    .with_message(e.to_string())
            })
        };
        Ok(Self {
            project_entry: compile(PROJECT_ENTRY_PATTERN)?,
            hint_path: compile(HINT_PATH_PATTERN)?,
            reference_include: compile(REFERENCE_INCLUDE_PATTERN)?,
        })
    }
}

/// Load the project graph rooted at a resolved definition file.
///
/// The cancellation token is checked between files.
///
/// # Errors
///
/// `Io` when the root file cannot be read, `LoadCancelled` when the token
/// fires during loading.
pub fn load_project(
    root: &Path,
    layout: &ProjectLayout,
    cancel: &CancellationToken,
) -> Result<ProjectGraph> {
    let patterns = Patterns::compile()?;
    let mut warnings = Vec::new();

    let module_files: Vec<(Option<String>, PathBuf)> = if layout.is_module_file(root) {
        vec![(None, root.to_path_buf())]
    } else {
        let text = fs::read_to_string(root).map_err(|e| io_error("read_root", root, e))?;
        module_entries(&patterns, root, &text, layout)
    };

    let mut modules = Vec::with_capacity(module_files.len());
    for (declared_name, module_path) in module_files {
        if cancel.is_cancelled() {
            return Err(load_cancelled(root));
        }
        if !module_path.is_file() {
            warnings.push(LoadWarning::new(&module_path, "module file not found"));
            continue;
        }
        let module = load_module(
            &patterns,
            declared_name,
            &module_path,
            layout,
            cancel,
            &mut warnings,
        )?;
        modules.push(module);
    }

    tracing::debug!(
        root = %root.display(),
        module_count = modules.len(),
        warning_count = warnings.len(),
        "project graph loaded"
    );

    Ok(ProjectGraph {
        root: root.to_path_buf(),
        modules,
        warnings,
    })
}

/// Module files declared by a root definition file, in declaration order.
/// Entries that are not module files (solution folders) are skipped.
fn module_entries(
    patterns: &Patterns,
    root: &Path,
    text: &str,
    layout: &ProjectLayout,
) -> Vec<(Option<String>, PathBuf)> {
    let base = root.parent().unwrap_or_else(|| Path::new(""));
    patterns
        .project_entry
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let relative = caps.get(2)?.as_str().replace('\\', "/");
            let path = base.join(relative);
            layout.is_module_file(&path).then_some((Some(name), path))
        })
        .collect()
}

fn load_module(
    patterns: &Patterns,
    declared_name: Option<String>,
    module_path: &Path,
    layout: &ProjectLayout,
    cancel: &CancellationToken,
    warnings: &mut Vec<LoadWarning>,
) -> Result<Module> {
    let name = declared_name
        .or_else(|| {
            module_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_default();
    let module_dir = module_path.parent().unwrap_or_else(|| Path::new(""));
    let mut module = Module::new(name, module_path);

    match fs::read_to_string(module_path) {
        Ok(text) => {
            for reference in references(patterns, module_dir, &text) {
                if reference.path.is_file() {
                    module = module.with_reference(reference);
                } else {
                    warnings.push(LoadWarning::new(
                        &reference.path,
                        format!("unresolved reference in module '{}'", module.name),
                    ));
                }
            }
        }
        Err(e) => warnings.push(LoadWarning::new(
            module_path,
            format!("module file unreadable: {e}"),
        )),
    }

    let walker = WalkDir::new(module_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .map(|name| layout.is_excluded_dir(name))
                    .unwrap_or(false)
        });

    for entry in walker {
        if cancel.is_cancelled() {
            return Err(load_cancelled(module_path));
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| module_dir.to_path_buf());
                warnings.push(LoadWarning::new(path, format!("directory unreadable: {e}")));
                continue;
            }
        };
        if !entry.file_type().is_file() || !layout.is_source_file(entry.path()) {
            continue;
        }
        match fs::read_to_string(entry.path()) {
            Ok(text) => module = module.with_document(Document::new(entry.path(), text)),
            Err(e) => warnings.push(LoadWarning::new(
                entry.path(),
                format!("document unreadable: {e}"),
            )),
        }
    }

    Ok(module)
}

/// Artifact paths declared by a module file, resolved against its directory.
/// `Include` values only count when they name an artifact file directly;
/// bare assembly names resolve through the framework, not the workspace.
fn references(patterns: &Patterns, module_dir: &Path, text: &str) -> Vec<Reference> {
    let hint_paths = patterns
        .hint_path
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()));
    let includes = patterns
        .reference_include
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|value| value.to_ascii_lowercase().ends_with(".dll"));

    let mut out: Vec<Reference> = Vec::new();
    for raw in hint_paths.chain(includes) {
        let path = module_dir.join(raw.replace('\\', "/"));
        if !out.iter().any(|r| r.path == path) {
            out.push(Reference::new(path));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_entries_skip_folders() {
        let text = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "App", "src\App\App.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "docs", "docs", "{22222222-2222-2222-2222-222222222222}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Lib", "Lib\Lib.csproj", "{33333333-3333-3333-3333-333333333333}"
EndProject
"#;
        let patterns = Patterns::compile().unwrap();
        let entries = module_entries(&patterns, Path::new("/w/Shop.sln"), text, &ProjectLayout::default());

        assert_eq!(
            entries,
            vec![
                (Some("App".to_string()), PathBuf::from("/w/src/App/App.csproj")),
                (Some("Lib".to_string()), PathBuf::from("/w/Lib/Lib.csproj")),
            ]
        );
    }

    #[test]
    fn test_references_from_hint_path_and_include() {
        let text = r#"
<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <Reference Include="Newtonsoft.Json, Version=13.0.0.0">
      <HintPath>..\packages\Newtonsoft.Json.dll</HintPath>
    </Reference>
    <Reference Include="System.Xml" />
    <Reference Include="lib\Vendor.Core.dll" />
  </ItemGroup>
</Project>
"#;
        let patterns = Patterns::compile().unwrap();
        let refs = references(&patterns, Path::new("/w/App"), text);
        let paths: Vec<&Path> = refs.iter().map(|r| r.path.as_path()).collect();

        assert_eq!(
            paths,
            vec![
                Path::new("/w/App/../packages/Newtonsoft.Json.dll"),
                Path::new("/w/App/lib/Vendor.Core.dll"),
            ]
        );
        assert_eq!(refs[0].identity(), Some("Newtonsoft.Json"));
    }
}
