//! Translation of pool and Diesel failures into typed user persistence errors.
//!
//! The repository tags every call with a [`UserOperation`]; the operation
//! decides which [`UserPersistenceError`] variant a low-level failure becomes.

use std::fmt;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::DisplayName;
use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

/// Name of the unique constraint guarding `users.name`.
pub(crate) const NAME_UNIQUE_CONSTRAINT: &str = "users_name_key";

/// Repository operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserOperation {
    FindById,
    FindByName,
    Save,
    Update,
    Delete,
}

impl UserOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::FindById => "find_by_id",
            Self::FindByName => "find_by_name",
            Self::Save => "save",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Wrap `message` in the error variant owned by this operation.
    pub(crate) fn failure(self, message: impl Into<String>) -> UserPersistenceError {
        match self {
            Self::FindById | Self::FindByName => UserPersistenceError::query(message),
            Self::Save => UserPersistenceError::save_query_row(message),
            Self::Update => UserPersistenceError::update_query(message),
            Self::Delete => UserPersistenceError::delete_query(message),
        }
    }

    fn writes_name(self) -> bool {
        matches!(self, Self::Save | Self::Update)
    }
}

impl fmt::Display for UserOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a pool checkout failure; the transaction never started.
pub(crate) fn map_pool_error(error: PoolError, operation: UserOperation) -> UserPersistenceError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    debug!(%operation, %message, "connection checkout failed");
    operation.failure(format!("connection unavailable: {message}"))
}

/// Map a Diesel failure raised inside a rolled-back transaction.
///
/// `name` is the display name being written, if any; a unique violation on
/// [`NAME_UNIQUE_CONSTRAINT`] during a write becomes
/// [`UserPersistenceError::NameConflict`].
pub(crate) fn map_diesel_error(
    error: DieselError,
    operation: UserOperation,
    name: Option<&DisplayName>,
) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(%operation, ?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%operation, error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => operation.failure("no user row matched"),
        DieselError::QueryBuilderError(_) => operation.failure("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if operation.writes_name() && info.constraint_name() == Some(NAME_UNIQUE_CONSTRAINT) =>
        {
            match name {
                Some(name) => UserPersistenceError::name_conflict(name.as_ref()),
                None => operation.failure(format!("database error: {}", info.message())),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            operation.failure("database connection error")
        }
        DieselError::DatabaseError(_, info) => {
            operation.failure(format!("database error: {}", info.message()))
        }
        other => operation.failure(other.to_string()),
    }
}
