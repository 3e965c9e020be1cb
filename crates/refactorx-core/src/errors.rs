use refactorx_core_types::{RequestId, TraceId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that can leave a workspace operation is classified by one of
/// these kinds. Each kind maps to a stable error code for programmatic
/// handling by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Workspace lifecycle
    WorkspaceNotInitialized,
    RootNotFound,
    LoadTimeout,
    LoadCancelled,

    // Actions
    ActionNotFound,
    RealizationFailed,
    ApplyPartialFailure,
    /// A provider produced edits that cannot be applied to the snapshot text
    InvalidEdit,

    // Decompilation boundary
    DecompilationUnavailable,

    // Per-call budget
    Timeout,
    Cancelled,

    // Validation
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,
    /// The analysis engine or a provider reported a failure
    EngineFault,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::WorkspaceNotInitialized => "ERR_WORKSPACE_NOT_INITIALIZED",
            ExErrorKind::RootNotFound => "ERR_ROOT_NOT_FOUND",
            ExErrorKind::LoadTimeout => "ERR_LOAD_TIMEOUT",
            ExErrorKind::LoadCancelled => "ERR_LOAD_CANCELLED",
            ExErrorKind::ActionNotFound => "ERR_ACTION_NOT_FOUND",
            ExErrorKind::RealizationFailed => "ERR_REALIZATION_FAILED",
            ExErrorKind::ApplyPartialFailure => "ERR_APPLY_PARTIAL_FAILURE",
            ExErrorKind::InvalidEdit => "ERR_INVALID_EDIT",
            ExErrorKind::DecompilationUnavailable => "ERR_DECOMPILATION_UNAVAILABLE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::EngineFault => "ERR_ENGINE_FAULT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Structural failures concern the workspace as a whole; the caller should
    /// re-initialize rather than retry discovery.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ExErrorKind::WorkspaceNotInitialized
                | ExErrorKind::RootNotFound
                | ExErrorKind::LoadTimeout
                | ExErrorKind::LoadCancelled
        )
    }

    /// Per-action failures leave the workspace usable; the caller should
    /// re-run discovery and pick another action.
    pub fn is_per_action(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ActionNotFound
                | ExErrorKind::RealizationFailed
                | ExErrorKind::InvalidEdit
                | ExErrorKind::ApplyPartialFailure
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context for debugging. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    action_id: Option<String>,
    snapshot_version: Option<u64>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            action_id: None,
            snapshot_version: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file or directory context
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add action id context
    pub fn with_action_id(mut self, id: impl Into<String>) -> Self {
        self.action_id = Some(id.into());
        self
    }

    /// Add snapshot version context
    pub fn with_snapshot_version(mut self, version: u64) -> Self {
        self.snapshot_version = Some(version);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the action id context, if any
    pub fn action_id(&self) -> Option<&str> {
        self.action_id.as_deref()
    }

    /// Get the snapshot version context, if any
    pub fn snapshot_version(&self) -> Option<u64> {
        self.snapshot_version
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(id) = &self.action_id {
            write!(f, " (action_id: {})", id)?;
        }
        if let Some(version) = self.snapshot_version {
            write!(f, " (snapshot_version: {})", version)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        ExError::new(ExErrorKind::Io).with_message(err.to_string())
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========

/// Failures while composing provider edits into document text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Edit targets a document that is not in the snapshot
    #[error("Document not found in snapshot: {path}")]
    DocumentNotFound { path: PathBuf },

    /// Add targets a path that already exists
    #[error("Document already exists: {path}")]
    DocumentExists { path: PathBuf },

    /// Add targets a module that is not in the snapshot
    #[error("Module not found in snapshot: {module}")]
    ModuleNotFound { module: String },

    /// Text edit range lies outside the document
    #[error("Edit range {start}..{end} is out of bounds for {path} ({len} bytes)")]
    RangeOutOfBounds {
        path: PathBuf,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Text edit range splits a UTF-8 character
    #[error("Edit range {start}..{end} does not fall on character boundaries in {path}")]
    NotCharBoundary {
        path: PathBuf,
        start: usize,
        end: usize,
    },

    /// Two text edits for the same document overlap
    #[error("Overlapping edits in {path} at byte {at}")]
    OverlappingEdits { path: PathBuf, at: usize },

    /// Edit follows a removal of the same document
    #[error("Document {path} was removed earlier in the same change")]
    EditAfterRemove { path: PathBuf },

    /// Remove then Add of one path under a different module
    #[error("Document {path} cannot move from module {from} to {to}")]
    CrossModuleMove {
        path: PathBuf,
        from: String,
        to: String,
    },
}

impl From<EditError> for ExError {
    fn from(err: EditError) -> Self {
        let path = match &err {
            EditError::DocumentNotFound { path }
            | EditError::DocumentExists { path }
            | EditError::RangeOutOfBounds { path, .. }
            | EditError::NotCharBoundary { path, .. }
            | EditError::OverlappingEdits { path, .. }
            | EditError::EditAfterRemove { path }
            | EditError::CrossModuleMove { path, .. } => Some(path.clone()),
            EditError::ModuleNotFound { .. } => None,
        };
        let mut ex = ExError::new(ExErrorKind::InvalidEdit)
            .with_op("compose_edits")
            .with_message(err.to_string());
        if let Some(path) = path {
            ex = ex.with_path(path);
        }
        ex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::WorkspaceNotInitialized,
            ExErrorKind::RootNotFound,
            ExErrorKind::LoadTimeout,
            ExErrorKind::LoadCancelled,
            ExErrorKind::ActionNotFound,
            ExErrorKind::RealizationFailed,
            ExErrorKind::ApplyPartialFailure,
            ExErrorKind::InvalidEdit,
            ExErrorKind::DecompilationUnavailable,
            ExErrorKind::Timeout,
            ExErrorKind::Cancelled,
            ExErrorKind::InvalidInput,
            ExErrorKind::Io,
            ExErrorKind::Serialization,
            ExErrorKind::EngineFault,
            ExErrorKind::Internal,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_structural_vs_per_action() {
        assert!(ExErrorKind::RootNotFound.is_structural());
        assert!(ExErrorKind::LoadTimeout.is_structural());
        assert!(!ExErrorKind::ActionNotFound.is_structural());
        assert!(ExErrorKind::ActionNotFound.is_per_action());
        assert!(ExErrorKind::RealizationFailed.is_per_action());
        assert!(!ExErrorKind::WorkspaceNotInitialized.is_per_action());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::ActionNotFound)
            .with_op("apply_action")
            .with_action_id("abc")
            .with_message("unknown or stale action id");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_ACTION_NOT_FOUND]"));
        assert!(text.contains("apply_action"));
        assert!(text.contains("action_id: abc"));
    }

    #[test]
    fn test_edit_error_converts_to_invalid_edit() {
        let err: ExError = EditError::OverlappingEdits {
            path: PathBuf::from("src/a.cs"),
            at: 4,
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidEdit);
        assert_eq!(err.path(), Some(Path::new("src/a.cs")));
    }
}
