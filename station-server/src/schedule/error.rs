//! Schedule source error types.

/// Errors from the master schedule source.
///
/// This is the only error that surfaces from a roster rebuild; callers
/// keep serving the previous working set when they see it.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The underlying database query failed.
    #[error("schedule database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The source could not be reached at all.
    #[error("schedule source unavailable: {message}")]
    Unavailable { message: String },
}
