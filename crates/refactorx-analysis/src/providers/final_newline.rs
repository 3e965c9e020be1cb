use super::{affected_files, document, file_label};
use crate::hygiene::{lacks_final_newline, line_ending, MISSING_FINAL_NEWLINE};
use refactorx_core::edits::{DocumentEdit, TextEdit};
use refactorx_core::errors::Result;
use refactorx_core::model::{CandidateAction, Snapshot};
use refactorx_core::provider::{ActionProvider, FixContext};

/// Appends the document's own line terminator
pub struct AddFinalNewline;

impl ActionProvider for AddFinalNewline {
    fn name(&self) -> &str {
        "final-newline"
    }

    fn provide_fixes(&self, context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        Ok(affected_files(context.diagnostics)
            .into_iter()
            .map(|path| {
                let title = format!("Add final newline to {}", file_label(context.snapshot, &path));
                CandidateAction::fix(
                    title,
                    [MISSING_FINAL_NEWLINE],
                    move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                        let doc = document(snapshot, &path)?;
                        if !lacks_final_newline(&doc.text) {
                            return Ok(Vec::new());
                        }
                        Ok(vec![DocumentEdit::Splice {
                            path: path.clone(),
                            edits: vec![TextEdit::insert(doc.text.len(), line_ending(&doc.text))],
                        }])
                    },
                )
            })
            .collect())
    }
}
