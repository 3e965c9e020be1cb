//! Workspace operations.
//!
//! Each submodule adds one operation to [`crate::Workspace`] together with
//! its request and response types.

pub mod actions;
pub mod apply;
pub mod diagnostics;
pub mod initialize;
pub mod recover;
