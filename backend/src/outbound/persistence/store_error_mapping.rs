//! Mapping from pool and Diesel failures to record store errors.

use tracing::{debug, warn};

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors into connection failures.
pub(super) fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors into store errors.
///
/// Unique violations become conflicts; this is how a lost username race or a
/// duplicate training surfaces to the domain.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => StoreError::conflict(
                info.constraint_name()
                    .map_or_else(|| "unique constraint violated".to_owned(), |name| {
                        format!("unique constraint {name} violated")
                    }),
            ),
            DatabaseErrorKind::ForeignKeyViolation => {
                warn!(
                    constraint_name = ?info.constraint_name(),
                    "foreign key violation"
                );
                StoreError::query("referenced record does not exist")
            }
            DatabaseErrorKind::ClosedConnection => {
                StoreError::connection("database connection error")
            }
            _ => StoreError::query("database error"),
        },
        _ => StoreError::query("database error"),
    }
}

/// Map a row-to-domain conversion failure.
pub(super) fn map_row_error(error: impl std::fmt::Display) -> StoreError {
    StoreError::query(format!("stored row is invalid: {error}"))
}
