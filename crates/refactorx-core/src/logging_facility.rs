//! Structured logging for workspace operations
//!
//! The CLI calls [`init`] once with a [`Profile`]; library code only emits
//! events, mostly through `log_op_start!`, `log_op_end!` and `log_op_error!`.
//! Tests install [`init_test_capture`] instead and assert on recorded events.
//!
//! ```rust
//! use refactorx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
