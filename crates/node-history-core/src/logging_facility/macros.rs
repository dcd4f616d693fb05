//! Canonical logging macros

/// Log the start of an operation
///
/// ```
/// # use node_history_core::log_op_start;
/// log_op_start!("build_changes");
/// log_op_start!("build_changes", node_type = "Vendor:Text");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use node_history_core::log_op_end;
/// log_op_end!("build_changes", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError`.
///
/// ```
/// # use node_history_core::{log_op_error, errors::HistoryError};
/// let err = HistoryError::NodeTypeNotFound { node_type: "Vendor:Gone".to_string() };
/// log_op_error!("build_changes", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::log_schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}
