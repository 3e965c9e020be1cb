//! Sort the leading block of `using` directives.
//!
//! Ordering: plain directives, then `using static`, then aliases. Inside a
//! group `System` namespaces come first, the rest compare case-insensitively.

use super::document;
use crate::hygiene::{line_ending, lines, Line};
use refactorx_core::edits::{DocumentEdit, TextEdit};
use refactorx_core::errors::Result;
use refactorx_core::model::{CandidateAction, Snapshot};
use refactorx_core::provider::{ActionProvider, RefactorContext};
use std::cmp::Ordering;
use std::ops::Range;
use std::path::Path;

pub const TITLE: &str = "Sort using directives";

pub struct SortUsingDirectives;

impl ActionProvider for SortUsingDirectives {
    fn name(&self) -> &str {
        "sort-usings"
    }

    fn provide_refactors(&self, context: &RefactorContext<'_>) -> Result<Vec<CandidateAction>> {
        let Some((_, doc)) = context.snapshot.document(&context.location.file) else {
            return Ok(Vec::new());
        };
        let Some(block) = UsingBlock::find(&doc.text) else {
            return Ok(Vec::new());
        };
        if !block.lines.contains(&context.location.line) || block.is_sorted() {
            return Ok(Vec::new());
        }

        let path = context.location.file.clone();
        Ok(vec![CandidateAction::refactor(
            TITLE,
            move |snapshot: &Snapshot| -> Result<Vec<DocumentEdit>> { sort(snapshot, &path) },
        )])
    }
}

fn sort(snapshot: &Snapshot, path: &Path) -> Result<Vec<DocumentEdit>> {
    let doc = document(snapshot, path)?;
    let Some(block) = UsingBlock::find(&doc.text) else {
        return Ok(Vec::new());
    };
    if block.is_sorted() {
        return Ok(Vec::new());
    }
    let replacement = block.sorted().join(line_ending(&doc.text));
    Ok(vec![DocumentEdit::Splice {
        path: path.to_path_buf(),
        edits: vec![TextEdit::new(block.bytes.clone(), replacement)],
    }])
}

/// Consecutive directives at the top of a document
#[derive(Debug)]
struct UsingBlock<'a> {
    directives: Vec<&'a str>,
    /// 1-based line numbers covered
    lines: Range<u32>,
    /// Byte range from the first directive to the end of the last one
    bytes: Range<usize>,
}

impl<'a> UsingBlock<'a> {
    fn find(text: &'a str) -> Option<Self> {
        let all = lines(text);
        let first = all.iter().position(|l| !is_preamble(l))?;
        let block: Vec<&Line<'a>> = all[first..]
            .iter()
            .take_while(|l| is_directive(l.content))
            .collect();
        if block.len() < 2 {
            return None;
        }
        let head = block[0];
        let tail = block[block.len() - 1];
        Some(Self {
            directives: block.iter().map(|l| l.content).collect(),
            lines: head.number..tail.number + 1,
            bytes: head.start..tail.start + tail.content.len(),
        })
    }

    fn sorted(&self) -> Vec<&'a str> {
        let mut sorted = self.directives.clone();
        sorted.sort_by(|a, b| compare(a, b));
        sorted
    }

    fn is_sorted(&self) -> bool {
        self.directives
            .windows(2)
            .all(|w| compare(w[0], w[1]) != Ordering::Greater)
    }
}

fn is_preamble(line: &Line<'_>) -> bool {
    let trimmed = line.content.trim();
    trimmed.is_empty() || trimmed.starts_with("//")
}

fn is_directive(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("using ") && trimmed.ends_with(';') && !trimmed.contains('(')
}

fn target(directive: &str) -> &str {
    directive
        .trim()
        .trim_start_matches("using ")
        .trim_end_matches(';')
        .trim()
}

fn group(target: &str) -> u8 {
    if target.starts_with("static ") {
        1
    } else if target.contains('=') {
        2
    } else {
        0
    }
}

fn is_system(target: &str) -> bool {
    let name = target.trim_start_matches("static ").trim();
    name == "System" || name.starts_with("System.")
}

fn compare(a: &str, b: &str) -> Ordering {
    let (a, b) = (target(a), target(b));
    group(a)
        .cmp(&group(b))
        .then_with(|| is_system(b).cmp(&is_system(a)))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}
