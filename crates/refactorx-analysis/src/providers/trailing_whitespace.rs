use super::{affected_files, document, file_label};
use crate::hygiene::{lines, TRAILING_WHITESPACE};
use refactorx_core::edits::{DocumentEdit, TextEdit};
use refactorx_core::errors::Result;
use refactorx_core::model::{CandidateAction, Snapshot};
use refactorx_core::provider::{ActionProvider, FixContext};
use std::path::{Path, PathBuf};

/// One fix per affected document, plus a fix-all when several are affected
pub struct RemoveTrailingWhitespace;

impl ActionProvider for RemoveTrailingWhitespace {
    fn name(&self) -> &str {
        "trailing-whitespace"
    }

    fn provide_fixes(&self, context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        let files = affected_files(context.diagnostics);
        let mut actions: Vec<CandidateAction> = files
            .iter()
            .cloned()
            .map(|path| {
                let title = format!("Remove trailing whitespace in {}", file_label(context.snapshot, &path));
                CandidateAction::fix(
                    title,
                    [TRAILING_WHITESPACE],
                    move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                        Ok(strip(snapshot, &path)?.into_iter().collect())
                    },
                )
            })
            .collect();

        if files.len() > 1 {
            actions.push(CandidateAction::fix(
                "Remove trailing whitespace in all documents",
                [TRAILING_WHITESPACE],
                move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> {
                    let mut edits = Vec::new();
                    for path in &files {
                        edits.extend(strip(snapshot, path)?);
                    }
                    Ok(edits)
                },
            ));
        }
        Ok(actions)
    }
}

fn strip(snapshot: &Snapshot, path: &Path) -> Result<Option<DocumentEdit>> {
    let doc = document(snapshot, path)?;
    let edits: Vec<TextEdit> = lines(&doc.text)
        .iter()
        .filter_map(|line| line.trailing_whitespace())
        .map(TextEdit::delete)
        .collect();
    if edits.is_empty() {
        return Ok(None);
    }
    Ok(Some(DocumentEdit::Splice {
        path: PathBuf::from(path),
        edits,
    }))
}
