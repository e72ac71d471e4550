//! Domain service owning the display-name uniqueness rule.
//!
//! The check reads through the [`UserRepository`] port and never writes. The
//! application service runs it immediately before a create or rename; the
//! read and the subsequent write are separate transactions, so the schema's
//! unique constraint on `users.name` remains the final arbiter under races.

use std::sync::Arc;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, UserId};

/// Enforces display-name uniqueness across all users.
pub struct UserService<R> {
    repository: Arc<R>,
}

impl<R> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> UserService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    /// Return `true` when any stored user holds exactly `name`.
    ///
    /// Storage errors are propagated unchanged.
    pub async fn is_name_taken(&self, name: &DisplayName) -> Result<bool, UserPersistenceError> {
        let existing = self.repository.find_by_name(name).await?;
        Ok(existing.is_some())
    }

    /// Return `true` when a user other than `id` holds exactly `name`.
    pub async fn is_name_taken_by_other(
        &self,
        name: &DisplayName,
        id: &UserId,
    ) -> Result<bool, UserPersistenceError> {
        let existing = self.repository.find_by_name(name).await?;
        Ok(existing.is_some_and(|user| user.id() != id))
    }
}
