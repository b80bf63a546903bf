use tessera_core::AppError;
use tracing::warn;

/// Maps a sqlx failure to the application taxonomy.
///
/// Connectivity failures become [`AppError::Unavailable`] so callers can tell
/// "could not determine" apart from "not allowed".
pub(crate) fn store_error(context: &str, error: sqlx::Error) -> AppError {
    if is_connectivity_error(&error) {
        warn!(context, %error, "store unreachable");
        return AppError::Unavailable(format!("{context}: {error}"));
    }

    if is_unique_violation(&error) {
        return AppError::Conflict(format!("{context}: {error}"));
    }

    AppError::Internal(format!("{context}: {error}"))
}

fn is_connectivity_error(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::WorkerCrashed
    )
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|database_error| database_error.is_unique_violation())
}
