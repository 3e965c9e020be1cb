use async_trait::async_trait;
use refactorx_core::decompile::{ExternalType, SymbolTable};
use refactorx_core::edits::DocumentEdit;
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::{
    CandidateAction, Diagnostic, Document, LineSpan, Module, Reference, Severity, Snapshot,
};
use refactorx_core::provider::{ActionProvider, Capability, FixContext, ProviderRegistry, RefactorContext};
use refactorx_core::RefactorxConfig;
use refactorx_engine::{AnalysisEngine, Workspace};
use refactorx_store::{DocumentSink, LoadWarning, ProjectGraph};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Diagnostic id reported for every line containing `bad`
pub const BAD_WORD: &str = "FK0001";
/// Diagnostic id reported for every document without a final newline
pub const NO_NEWLINE: &str = "FK0002";

/// In-memory analysis engine over a fixed module list.
///
/// Diagnostics are derived from document text, so they change with commits.
pub struct FakeEngine {
    modules: Vec<Module>,
    warnings: Vec<LoadWarning>,
    load_delay: Duration,
    reload_delay: Duration,
    loads: AtomicUsize,
    external_types: Vec<ExternalType>,
}

impl FakeEngine {
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            warnings: Vec::new(),
            load_delay: Duration::ZERO,
            reload_delay: Duration::ZERO,
            loads: AtomicUsize::new(0),
            external_types: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_warning(mut self, path: &Path, message: &str) -> Self {
        self.warnings.push(LoadWarning {
            path: path.to_path_buf(),
            message: message.to_string(),
        });
        self
    }

    #[allow(dead_code)]
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Delay applied to every load after the first
    #[allow(dead_code)]
    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    #[allow(dead_code)]
    pub fn with_external_type(mut self, qualified_name: &str, assembly: &str) -> Self {
        self.external_types
            .push(ExternalType::new(qualified_name, assembly));
        self
    }
}

struct FixedSymbols(Vec<ExternalType>);

impl SymbolTable for FixedSymbols {
    fn external_types(&self, _module: &Module) -> Vec<ExternalType> {
        self.0.clone()
    }
}

#[async_trait]
impl AnalysisEngine for FakeEngine {
    async fn load(&self, root: &Path, cancel: &CancellationToken) -> Result<ProjectGraph> {
        let delay = if self.loads.fetch_add(1, Ordering::SeqCst) == 0 {
            self.load_delay
        } else {
            self.load_delay.max(self.reload_delay)
        };
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    return Err(ExError::new(ExErrorKind::LoadCancelled));
                }
            }
        }
        Ok(ProjectGraph {
            root: root.to_path_buf(),
            modules: self.modules.clone(),
            warnings: self.warnings.clone(),
        })
    }

    async fn diagnostics(&self, snapshot: &Snapshot) -> Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for (_, doc) in snapshot.documents() {
            for (idx, line) in doc.text.lines().enumerate() {
                if line.contains("bad") {
                    out.push(
                        Diagnostic::new(BAD_WORD, "line contains 'bad'", Severity::Warning, "Fake")
                            .at(&doc.path, LineSpan::line(idx as u32 + 1)),
                    );
                }
            }
            if !doc.text.is_empty() && !doc.text.ends_with('\n') {
                let last = doc.text.lines().count() as u32;
                out.push(
                    Diagnostic::new(NO_NEWLINE, "missing final newline", Severity::Info, "Fake")
                        .at(&doc.path, LineSpan::line(last)),
                );
            }
        }
        // Reverse so the workspace's ordering is what tests observe
        out.reverse();
        Ok(out)
    }

    fn symbol_table(&self) -> Arc<dyn SymbolTable> {
        Arc::new(FixedSymbols(self.external_types.clone()))
    }
}

/// Replaces `bad` with `good` in every document that has the diagnostic
pub struct ReplaceBadWord;

impl ActionProvider for ReplaceBadWord {
    fn name(&self) -> &str {
        "replace-bad-word"
    }

    fn provide_fixes(&self, context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        let mut paths: Vec<PathBuf> = context
            .diagnostics
            .iter()
            .filter_map(|d| d.file.clone())
            .collect();
        paths.dedup();
        Ok(paths
            .into_iter()
            .map(|path| {
                let title = format!("Replace 'bad' in {}", path.display());
                CandidateAction::fix(
                    title,
                    [BAD_WORD],
                    move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                        let (_, doc) = snapshot.document(&path).ok_or_else(|| {
                            ExError::new(ExErrorKind::RealizationFailed)
                                .with_message("document gone")
                        })?;
                        Ok(vec![DocumentEdit::Update {
                            path: path.clone(),
                            text: doc.text.replace("bad", "good"),
                        }])
                    },
                )
            })
            .collect())
    }
}

/// Fix every document that has the diagnostic in one action
pub struct ReplaceBadWordEverywhere;

impl ActionProvider for ReplaceBadWordEverywhere {
    fn name(&self) -> &str {
        "replace-bad-word-everywhere"
    }

    fn provide_fixes(&self, _context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        Ok(vec![CandidateAction::fix(
            "Replace 'bad' everywhere",
            [BAD_WORD],
            |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                Ok(snapshot
                    .documents()
                    .filter(|(_, d)| d.text.contains("bad"))
                    .map(|(_, d)| DocumentEdit::Update {
                        path: d.path.clone(),
                        text: d.text.replace("bad", "good"),
                    })
                    .collect())
            },
        )])
    }
}

/// Offers fixed titles for any diagnostic id it is registered for
pub struct TitledFixes {
    pub name: &'static str,
    pub titles: Vec<&'static str>,
}

impl ActionProvider for TitledFixes {
    fn name(&self) -> &str {
        self.name
    }

    fn provide_fixes(&self, context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        let ids: Vec<String> = context.diagnostics.iter().map(|d| d.id.clone()).collect();
        Ok(self
            .titles
            .iter()
            .map(|title| {
                CandidateAction::fix(
                    *title,
                    ids.clone(),
                    |_: &Snapshot| -> Result<Vec<DocumentEdit>> { Ok(Vec::new()) },
                )
            })
            .collect())
    }
}

/// Refactoring that appends a comment to the document at the location
pub struct AppendComment;

impl ActionProvider for AppendComment {
    fn name(&self) -> &str {
        "append-comment"
    }

    fn provide_refactors(&self, context: &RefactorContext<'_>) -> Result<Vec<CandidateAction>> {
        let path = context.location.file.clone();
        Ok(vec![CandidateAction::refactor(
            "Append comment",
            move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                let (_, doc) = snapshot.document(&path).ok_or_else(|| {
                    ExError::new(ExErrorKind::RealizationFailed).with_message("document gone")
                })?;
                Ok(vec![DocumentEdit::Update {
                    path: path.clone(),
                    text: format!("{}// reviewed\n", doc.text),
                }])
            },
        )])
    }
}

/// Realization always fails
pub struct BrokenRealization;

impl ActionProvider for BrokenRealization {
    fn name(&self) -> &str {
        "broken-realization"
    }

    fn provide_fixes(&self, _context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        Ok(vec![CandidateAction::fix(
            "Broken fix",
            [NO_NEWLINE],
            |_: &Snapshot| -> Result<Vec<DocumentEdit>> {
                Err(ExError::new(ExErrorKind::EngineFault).with_message("cannot compute edits"))
            },
        )])
    }
}

/// Provider that panics while producing candidates
pub struct PanickingProvider;

impl ActionProvider for PanickingProvider {
    fn name(&self) -> &str {
        "panicking"
    }

    fn provide_fixes(&self, _context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        panic!("provider bug")
    }
}

/// Sink that writes to disk until its write budget is used up
pub struct FailingSink {
    writes_allowed: usize,
    writes: AtomicUsize,
    pub written: Mutex<Vec<PathBuf>>,
}

impl FailingSink {
    #[allow(dead_code)]
    pub fn after(writes_allowed: usize) -> Self {
        Self {
            writes_allowed,
            writes: AtomicUsize::new(0),
            written: Mutex::new(Vec::new()),
        }
    }
}

impl DocumentSink for FailingSink {
    fn write(&self, path: &Path, text: &str) -> Result<()> {
        if self.writes.fetch_add(1, Ordering::SeqCst) >= self.writes_allowed {
            return Err(ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message("disk full"));
        }
        fs::write(path, text)?;
        self.written.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Temporary project on disk: `App.sln` plus the given documents under `App/`
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(documents: &[(&str, &str)]) -> (Self, Vec<Module>) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("App.sln"), "").unwrap();
        let app_dir = dir.path().join("App");
        fs::create_dir_all(&app_dir).unwrap();

        let mut module = Module::new("App", app_dir.join("App.csproj"))
            .with_reference(Reference::new(dir.path().join("packages/Vendor.dll")));
        for (name, text) in documents {
            let path = app_dir.join(name);
            fs::write(&path, text).unwrap();
            module = module.with_document(Document::new(path, *text));
        }
        (Self { dir }, vec![module])
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    #[allow(dead_code)]
    pub fn doc(&self, name: &str) -> PathBuf {
        self.dir.path().join("App").join(name)
    }

    #[allow(dead_code)]
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.doc(name)).unwrap()
    }
}

/// Registry with the bad-word fix, a refactoring and a broken fix
#[allow(dead_code)]
pub fn default_registry() -> ProviderRegistry {
    ProviderRegistry::new()
        .register(Capability::fixes([BAD_WORD]), || ReplaceBadWord)
        .register(Capability::Refactors, || AppendComment)
        .register(Capability::fixes([NO_NEWLINE]), || BrokenRealization)
}

#[allow(dead_code)]
pub fn workspace(engine: FakeEngine, registry: ProviderRegistry, config: RefactorxConfig) -> Workspace {
    Workspace::new(Arc::new(engine), registry, config)
}
