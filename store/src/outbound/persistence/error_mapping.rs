//! Mapping from `postgres` client errors to record persistence errors.

use tracing::debug;

use crate::domain::ports::RecordPersistenceError;

/// Map a client error into a connection or query error.
///
/// Server-side failures keep the SQLSTATE code and server message so that
/// logs name the failing constraint, table or column.
pub(super) fn map_postgres_error(error: &postgres::Error) -> RecordPersistenceError {
    if let Some(db_error) = error.as_db_error() {
        debug!(
            code = db_error.code().code(),
            message = db_error.message(),
            "postgres statement failed"
        );
        return RecordPersistenceError::query(format!(
            "{} (SQLSTATE {})",
            db_error.message(),
            db_error.code().code()
        ));
    }

    debug!(error = %error, "postgres client error");
    if error.is_closed() {
        RecordPersistenceError::connection(error.to_string())
    } else {
        RecordPersistenceError::query(error.to_string())
    }
}
