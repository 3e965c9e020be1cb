use super::document;
use refactorx_core::edits::DocumentEdit;
use refactorx_core::errors::{ExError, ExErrorKind, Result};
use refactorx_core::model::{CandidateAction, Snapshot};
use refactorx_core::provider::{ActionProvider, RefactorContext};

pub const TITLE: &str = "Delete empty document";

/// Offered on a document holding nothing but whitespace
pub struct DeleteEmptyDocument;

impl ActionProvider for DeleteEmptyDocument {
    fn name(&self) -> &str {
        "delete-empty-document"
    }

    fn provide_refactors(&self, context: &RefactorContext<'_>) -> Result<Vec<CandidateAction>> {
        match context.snapshot.document(&context.location.file) {
            Some((_, doc)) if doc.text.trim().is_empty() => {}
            _ => return Ok(Vec::new()),
        }

        let path = context.location.file.clone();
        Ok(vec![CandidateAction::refactor(
            TITLE,
            move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                let doc = document(snapshot, &path)?;
                if !doc.text.trim().is_empty() {
                    return Err(ExError::new(ExErrorKind::RealizationFailed)
                        .with_path(&path)
                        .with_message("document is no longer empty"));
                }
                Ok(vec![DocumentEdit::Remove { path: path.clone() }])
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refactorx_core::model::{Document, Module, SourceLocation};

    fn snapshot(text: &str) -> Snapshot {
        let module = Module::new("App", "/w/App/App.csproj")
            .with_document(Document::new("/w/App/Empty.cs", text));
        Snapshot::new(1, "/w/App.sln", vec![module])
    }

    fn offered(snapshot: &Snapshot) -> Vec<CandidateAction> {
        DeleteEmptyDocument
            .provide_refactors(&RefactorContext {
                snapshot,
                location: &SourceLocation::new("/w/App/Empty.cs", 1, 1),
            })
            .unwrap()
    }

    #[test]
    fn test_offered_for_blank_document() {
        let snapshot = snapshot(" \n\n");
        let actions = offered(&snapshot);
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].realize(&snapshot).unwrap(),
            vec![DocumentEdit::Remove {
                path: "/w/App/Empty.cs".into()
            }]
        );
    }

    #[test]
    fn test_not_offered_for_content() {
        assert!(offered(&snapshot("class A {}\n")).is_empty());
    }

    #[test]
    fn test_realization_rechecks_document() {
        let actions = offered(&snapshot(""));
        let err = actions[0].realize(&snapshot("class A {}\n")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::RealizationFailed);
    }
}
