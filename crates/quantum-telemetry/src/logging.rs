//! Structured logging macros.
//!
//! Every pipeline event carries the same field names so log queries can join
//! a transaction or vote across subsystems:
//! - `subsystem`: emitting subsystem (`qv-01` .. `qv-06`)
//! - `run_id`: transaction id or vote id
//! - `stage`: pipeline stage, when relevant

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a pipeline-run event with standard fields.
#[macro_export]
macro_rules! log_run_event {
    ($level:ident, $subsystem:expr, $msg:expr, $run_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            run_id = %$run_id,
            $($($field)*,)?
            $msg
        )
    };
}
