//! Application service exposing user registration, lookup, rename and removal.
//!
//! Callers hand in plain strings and get plain [`UserData`] back. The service
//! converts input into value objects, asks [`UserService`] whether a name is
//! free, and delegates writes to the [`UserRepository`] port. Repository
//! errors pass through unchanged, except that a schema-level name conflict is
//! reported as [`UserApplicationError::DuplicateName`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{UserIdGenerator, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, User, UserApplicationError, UserData, UserId, UserService};

/// Request to rename an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserCommand {
    /// Identifier of the user to rename.
    pub id: String,
    /// Requested display name.
    pub name: String,
}

impl UpdateUserCommand {
    /// Build a command from anything string-like.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Orchestrates user use cases over the repository and uniqueness service.
pub struct UserApplicationService<R, G> {
    repository: Arc<R>,
    user_service: UserService<R>,
    id_generator: Arc<G>,
}

impl<R, G> Clone for UserApplicationService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            user_service: self.user_service.clone(),
            id_generator: Arc::clone(&self.id_generator),
        }
    }
}

impl<R, G> UserApplicationService<R, G> {
    /// Create a new service; the uniqueness check shares `repository`.
    pub fn new(repository: Arc<R>, id_generator: Arc<G>) -> Self {
        let user_service = UserService::new(Arc::clone(&repository));
        Self {
            repository,
            user_service,
            id_generator,
        }
    }
}

impl<R, G> UserApplicationService<R, G>
where
    R: UserRepository,
    G: UserIdGenerator,
{
    fn map_write_error(error: UserPersistenceError) -> UserApplicationError {
        match error {
            UserPersistenceError::NameConflict { name } => {
                UserApplicationError::duplicate_name(name)
            }
            other => UserApplicationError::Persistence(other),
        }
    }

    async fn load_existing(&self, id: &UserId) -> Result<User, UserApplicationError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserApplicationError::not_found(id.as_ref()))
    }

    /// Register a new user under `raw_name`.
    ///
    /// # Errors
    ///
    /// - [`UserApplicationError::Validation`] when the name is malformed.
    /// - [`UserApplicationError::DuplicateName`] when another user holds it.
    /// - [`UserApplicationError::Persistence`] when storage fails.
    pub async fn register(&self, raw_name: &str) -> Result<UserData, UserApplicationError> {
        let name = DisplayName::new(raw_name)?;
        let id = self.id_generator.next_id();

        if self.user_service.is_name_taken(&name).await? {
            debug!(name = %name, "registration rejected: name taken");
            return Err(UserApplicationError::duplicate_name(name));
        }

        let user = User::new(id, name);
        self.repository
            .save(&user)
            .await
            .map_err(Self::map_write_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(UserData::from(user))
    }

    /// Look up a user by identifier.
    ///
    /// Returns `Ok(None)` when no user has that identifier.
    pub async fn get(&self, raw_id: &str) -> Result<Option<UserData>, UserApplicationError> {
        let id = UserId::new(raw_id)?;
        let user = self.repository.find_by_id(&id).await?;
        Ok(user.map(UserData::from))
    }

    /// Rename an existing user.
    ///
    /// Renaming a user to their current name succeeds without a uniqueness
    /// check.
    ///
    /// # Errors
    ///
    /// - [`UserApplicationError::Validation`] when either field is malformed.
    /// - [`UserApplicationError::NotFound`] when the user does not exist.
    /// - [`UserApplicationError::DuplicateName`] when another user holds the
    ///   requested name.
    /// - [`UserApplicationError::Persistence`] when storage fails.
    pub async fn update(&self, command: UpdateUserCommand) -> Result<(), UserApplicationError> {
        let id = UserId::new(&command.id)?;
        let name = DisplayName::new(command.name)?;

        let user = self.load_existing(&id).await?;

        if *user.display_name() != name
            && self.user_service.is_name_taken_by_other(&name, &id).await?
        {
            debug!(user_id = %id, name = %name, "rename rejected: name taken");
            return Err(UserApplicationError::duplicate_name(name));
        }

        let renamed = user.rename(name);
        self.repository
            .update(&renamed)
            .await
            .map_err(Self::map_write_error)?;

        info!(user_id = %id, "user renamed");
        Ok(())
    }

    /// Remove an existing user.
    ///
    /// # Errors
    ///
    /// - [`UserApplicationError::Validation`] when the identifier is malformed.
    /// - [`UserApplicationError::NotFound`] when the user does not exist.
    /// - [`UserApplicationError::Persistence`] when storage fails.
    pub async fn delete(&self, raw_id: &str) -> Result<(), UserApplicationError> {
        let id = UserId::new(raw_id)?;
        let user = self.load_existing(&id).await?;

        self.repository.delete(&user).await?;

        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_application_service_tests.rs"]
mod tests;
