//! Correlation types for request tracking and tracing
//!
//! Every workspace operation runs under a [`RequestContext`] so that the
//! start/end events of one call, and any warnings logged while it runs, can
//! be tied together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, time-ordered identifier (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Get the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap an identifier received from a caller
            pub fn from_string(s: String) -> Self {
                Self(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Unique identifier for a single workspace call
    RequestId
);

correlation_id!(
    /// Identifier supplied by the surrounding transport to link several calls
    TraceId
);

/// Context carried through one workspace operation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
    pub op: &'static str,
}

impl RequestContext {
    /// Create a context for the named operation with a fresh RequestId
    pub fn for_op(op: &'static str) -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
            op,
        }
    }

    /// Attach a caller-supplied TraceId
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}
