use refactorx_core::edits::DocumentEdit;
use refactorx_core::errors::Result;
use refactorx_core::{CandidateAction, Document, Module, Reference, Snapshot};

fn no_edits(_: &Snapshot) -> Result<Vec<DocumentEdit>> {
    Ok(Vec::new())
}

/// Fix candidate that produces no edits
#[allow(dead_code)]
pub fn fix(title: &str, diagnostic_id: &str) -> CandidateAction {
    CandidateAction::fix(title, [diagnostic_id], no_edits)
}

/// Refactor candidate that produces no edits
#[allow(dead_code)]
pub fn refactor(title: &str) -> CandidateAction {
    CandidateAction::refactor(title, no_edits)
}

#[allow(dead_code)]
pub fn titles(actions: &[CandidateAction]) -> Vec<String> {
    actions.iter().map(|a| a.title.clone()).collect()
}

/// Two-module snapshot rooted at `/w/App.sln`
#[allow(dead_code)]
pub fn sample_snapshot() -> Snapshot {
    let app = Module::new("App", "/w/App/App.csproj")
        .with_document(Document::new("/w/App/Program.cs", "class Program {}\n"))
        .with_document(Document::new("/w/App/Util.cs", "class Util {}\n"))
        .with_reference(Reference::new("/w/packages/Newtonsoft.Json.dll"));
    let lib = Module::new("Lib", "/w/Lib/Lib.csproj")
        .with_document(Document::new("/w/Lib/Lib.cs", "class Lib {}\n"));
    Snapshot::new(1, "/w/App.sln", vec![app, lib])
}
