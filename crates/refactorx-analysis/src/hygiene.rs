//! Text hygiene diagnostics.
//!
//! `RX0001` flags each line ending in spaces or tabs; `RX0002` flags a
//! non-empty document whose last line has no terminator.

use refactorx_core::model::{Diagnostic, Document, LineSpan, Severity, Snapshot};
use std::ops::Range;

pub const TRAILING_WHITESPACE: &str = "RX0001";
pub const MISSING_FINAL_NEWLINE: &str = "RX0002";

const CATEGORY: &str = "Style";

/// A line of a document with its byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: u32,
    /// Byte offset of the first character
    pub start: usize,
    /// Line content without its terminator
    pub content: &'a str,
}

impl Line<'_> {
    /// Byte range of the trailing spaces and tabs, if any
    pub fn trailing_whitespace(&self) -> Option<Range<usize>> {
        let trimmed = self.content.trim_end_matches([' ', '\t']);
        if trimmed.len() == self.content.len() {
            return None;
        }
        Some(self.start + trimmed.len()..self.start + self.content.len())
    }
}

/// Split text into lines, treating both `\n` and `\r\n` as terminators
pub fn lines(text: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, raw) in text.split_inclusive('\n').enumerate() {
        let content = raw
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(raw);
        out.push(Line {
            number: idx as u32 + 1,
            start,
            content,
        });
        start += raw.len();
    }
    out
}

/// The line terminator a document already uses
pub fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

pub fn lacks_final_newline(text: &str) -> bool {
    !text.is_empty() && !text.ends_with('\n')
}

pub fn analyze_document(document: &Document) -> Vec<Diagnostic> {
    let lines = lines(&document.text);
    let mut out = Vec::new();

    for line in &lines {
        if let Some(range) = line.trailing_whitespace() {
            let start_column = (range.start - line.start) as u32 + 1;
            let end_column = (range.end - line.start) as u32 + 1;
            out.push(
                Diagnostic::new(
                    TRAILING_WHITESPACE,
                    "Line has trailing whitespace",
                    Severity::Info,
                    CATEGORY,
                )
                .at(
                    &document.path,
                    LineSpan::new(line.number, start_column, line.number, end_column),
                ),
            );
        }
    }

    if lacks_final_newline(&document.text) {
        let last = lines.len() as u32;
        out.push(
            Diagnostic::new(
                MISSING_FINAL_NEWLINE,
                "Document does not end with a newline",
                Severity::Info,
                CATEGORY,
            )
            .at(&document.path, LineSpan::line(last)),
        );
    }

    out
}

pub fn analyze(snapshot: &Snapshot) -> Vec<Diagnostic> {
    snapshot
        .documents()
        .flat_map(|(_, document)| analyze_document(document))
        .collect()
}
