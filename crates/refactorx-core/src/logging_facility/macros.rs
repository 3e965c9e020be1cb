//! Operation logging macros
//!
//! Every workspace operation emits one `start` event and exactly one of
//! `end` or `end_error`. Extra `key = value` fields pass straight through to
//! `tracing`.

/// Log the start of an operation
///
/// ```
/// # use refactorx_core::log_op_start;
/// log_op_start!("list_actions");
/// log_op_start!("apply_action", action_id = "a1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::refactorx_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use refactorx_core::log_op_end;
/// log_op_end!("list_actions", duration_ms = 42, action_count = 3usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::refactorx_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log the failed end of an operation
///
/// Kind, code and message come from the [`ExError`](crate::errors::ExError);
/// so do the action id and snapshot version when the error carries them.
///
/// ```
/// # use refactorx_core::log_op_error;
/// use refactorx_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::ActionNotFound).with_action_id("a1");
/// log_op_error!("apply_action", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::refactorx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            err_action_id = ex_err.action_id(),
            err_snapshot_version = ex_err.snapshot_version(),
            $($($field)*)?
        );
    }};
}
