//! Diagnostics reported by the analysis engine for one snapshot.

use crate::errors::{ExError, ExErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Diagnostic severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hidden => "hidden",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl FromStr for Severity {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Ok(Severity::Hidden),
            "info" | "information" | "suggestion" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_severity")
                .with_message(format!(
                    "unknown severity '{}', expected hidden|info|warning|error",
                    other
                ))),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based line/column range, end inclusive on the line axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSpan {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl LineSpan {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Span covering a whole line
    pub fn line(line: u32) -> Self {
        Self::new(line, 1, line, u32::MAX)
    }

    pub fn contains(&self, line: u32, column: u32) -> bool {
        let after_start =
            line > self.start_line || (line == self.start_line && column >= self.start_column);
        let before_end =
            line < self.end_line || (line == self.end_line && column <= self.end_column);
        after_start && before_end
    }
}

/// A cursor position in a document (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// An issue reported by the analysis engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<LineSpan>,
    pub has_fix: bool,
}

impl Diagnostic {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            severity,
            category: category.into(),
            file: None,
            span: None,
            has_fix: false,
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, span: LineSpan) -> Self {
        self.file = Some(file.into());
        self.span = Some(span);
        self
    }

    /// Whether this diagnostic is located at the given cursor position
    pub fn covers(&self, location: &SourceLocation) -> bool {
        match (&self.file, &self.span) {
            (Some(file), Some(span)) => {
                *file == location.file && span.contains(location.line, location.column)
            }
            _ => false,
        }
    }
}

/// Deterministic output order: file, position, then id. Location-less
/// diagnostics sort first.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.span.cmp(&b.span))
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.message.cmp(&b.message))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_and_order() {
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("information".parse::<Severity>().unwrap(), Severity::Info);
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Info > Severity::Hidden);

        let err = "fatal".parse::<Severity>().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_span_contains() {
        let span = LineSpan::new(3, 5, 4, 2);
        assert!(span.contains(3, 5));
        assert!(span.contains(3, 80));
        assert!(span.contains(4, 2));
        assert!(!span.contains(3, 4));
        assert!(!span.contains(4, 3));
        assert!(LineSpan::line(7).contains(7, 1000));
    }

    #[test]
    fn test_covers_requires_same_file() {
        let diag = Diagnostic::new("RX0001", "m", Severity::Info, "Style")
            .at("/w/a.cs", LineSpan::line(2));
        assert!(diag.covers(&SourceLocation::new("/w/a.cs", 2, 1)));
        assert!(!diag.covers(&SourceLocation::new("/w/b.cs", 2, 1)));
        assert!(!diag.covers(&SourceLocation::new("/w/a.cs", 3, 1)));
    }

    #[test]
    fn test_sort_is_positional() {
        let mut diags = vec![
            Diagnostic::new("B", "", Severity::Info, "").at("/w/b.cs", LineSpan::line(1)),
            Diagnostic::new("A", "", Severity::Info, "").at("/w/a.cs", LineSpan::line(9)),
            Diagnostic::new("A", "", Severity::Info, "").at("/w/a.cs", LineSpan::line(2)),
            Diagnostic::new("Z", "", Severity::Error, ""),
        ];
        sort_diagnostics(&mut diags);
        let order: Vec<_> = diags
            .iter()
            .map(|d| (d.id.as_str(), d.span.map(|s| s.start_line)))
            .collect();
        assert_eq!(
            order,
            vec![("Z", None), ("A", Some(2)), ("A", Some(9)), ("B", Some(1))]
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let diag = Diagnostic::new("CS0103", "name does not exist", Severity::Error, "Compiler");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["hasFix"], false);
        assert_eq!(json["severity"], "error");
        assert!(json.get("file").is_none());
    }
}
