//! Field keys and event names shared by the logging macros and test capture

pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

/// Emitted when an operation begins
pub const EVENT_START: &str = "start";
/// Emitted when an operation returns successfully
pub const EVENT_END: &str = "end";
/// Emitted instead of [`EVENT_END`] when an operation fails
pub const EVENT_END_ERROR: &str = "end_error";
