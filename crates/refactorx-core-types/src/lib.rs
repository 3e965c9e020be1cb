//! Core types shared across refactorx facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: field keys and event names of operation logs

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
