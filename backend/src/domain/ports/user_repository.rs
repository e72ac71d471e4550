//! Port abstraction for user persistence adapters and their errors.
//!
//! Every operation touches exactly one `users` row and runs inside its own
//! transaction in the adapter. Failures are reported per operation so callers
//! can tell a failed read from a failed write without inspecting messages.

use async_trait::async_trait;

use crate::domain::{DisplayName, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    ///
    /// Each variant is returned only after the enclosing transaction has been
    /// rolled back.
    pub enum UserPersistenceError {
        /// A lookup by identifier or name failed.
        Query { message: String } => "user query failed: {message}",
        /// Inserting a new user row failed.
        SaveQueryRow { message: String } => "saving user failed: {message}",
        /// Updating an existing user row failed.
        UpdateQuery { message: String } => "updating user failed: {message}",
        /// Deleting a user row failed.
        DeleteQuery { message: String } => "deleting user failed: {message}",
        /// The storage engine rejected a write because the name is already stored.
        NameConflict { name: String } => "display name already stored: {name}",
    }
}

/// Port for user storage and retrieval.
///
/// Read operations model absence as `Ok(None)`; only storage failures are
/// errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact display name.
    async fn find_by_name(&self, name: &DisplayName)
    -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user row.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite the display name of the row matching `user.id()`.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove the row matching `user.id()`.
    async fn delete(&self, user: &User) -> Result<(), UserPersistenceError>;
}
