//! Test doubles for the user ports.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites under `tests/`. Nothing here talks to a database.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{UserIdGenerator, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, User, UserId};

/// Repository call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryCall {
    /// `find_by_id`
    FindById,
    /// `find_by_name`
    FindByName,
    /// `save`
    Save,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

impl RepositoryCall {
    fn injected_error(self) -> UserPersistenceError {
        const MESSAGE: &str = "injected failure";
        match self {
            Self::FindById | Self::FindByName => UserPersistenceError::query(MESSAGE),
            Self::Save => UserPersistenceError::save_query_row(MESSAGE),
            Self::Update => UserPersistenceError::update_query(MESSAGE),
            Self::Delete => UserPersistenceError::delete_query(MESSAGE),
        }
    }
}

/// In-memory `UserRepository` mirroring the PostgreSQL adapter's contract.
///
/// Display names are unique, as under the `users_name_key` constraint, and
/// writes that match no row fail with the operation's error. Calls marked
/// with [`InMemoryUserRepository::fail_on`] fail without touching the store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<HashMap<UserId, User>>,
    failing: Mutex<HashSet<RepositoryCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `call` fail until [`Self::recover`] is called.
    pub fn fail_on(&self, call: RepositoryCall) {
        lock(&self.failing).insert(call);
    }

    /// Clear all injected failures.
    pub fn recover(&self) {
        lock(&self.failing).clear();
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        lock(&self.store).len()
    }

    /// Whether the repository holds no users.
    pub fn is_empty(&self) -> bool {
        lock(&self.store).is_empty()
    }

    /// Stored user with identifier `id`, if any.
    pub fn stored(&self, id: &UserId) -> Option<User> {
        lock(&self.store).get(id).cloned()
    }

    fn check(&self, call: RepositoryCall) -> Result<(), UserPersistenceError> {
        if lock(&self.failing).contains(&call) {
            return Err(call.injected_error());
        }
        Ok(())
    }
}

fn name_held_by_other(
    store: &HashMap<UserId, User>,
    name: &DisplayName,
    id: &UserId,
) -> bool {
    store
        .values()
        .any(|user| user.display_name() == name && user.id() != id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.check(RepositoryCall::FindById)?;
        Ok(lock(&self.store).get(id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &DisplayName,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.check(RepositoryCall::FindByName)?;
        Ok(lock(&self.store)
            .values()
            .find(|user| user.display_name() == name)
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.check(RepositoryCall::Save)?;
        let mut store = lock(&self.store);
        if store.contains_key(user.id()) {
            return Err(UserPersistenceError::save_query_row(format!(
                "duplicate user id: {}",
                user.id()
            )));
        }
        if name_held_by_other(&store, user.display_name(), user.id()) {
            return Err(UserPersistenceError::name_conflict(
                user.display_name().as_ref(),
            ));
        }
        store.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.check(RepositoryCall::Update)?;
        let mut store = lock(&self.store);
        if !store.contains_key(user.id()) {
            return Err(UserPersistenceError::update_query("no user row matched"));
        }
        if name_held_by_other(&store, user.display_name(), user.id()) {
            return Err(UserPersistenceError::name_conflict(
                user.display_name().as_ref(),
            ));
        }
        store.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.check(RepositoryCall::Delete)?;
        lock(&self.store)
            .remove(user.id())
            .map(|_| ())
            .ok_or_else(|| UserPersistenceError::delete_query("no user row matched"))
    }
}

/// Identifier generator yielding `user-1`, `user-2`, ... in call order.
#[derive(Debug, Default)]
pub struct SequentialUserIdGenerator {
    counter: AtomicU64,
}

impl SequentialUserIdGenerator {
    /// Create a generator starting at `user-1`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserIdGenerator for SequentialUserIdGenerator {
    fn next_id(&self) -> UserId {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        UserId::new(format!("user-{next}")).unwrap_or_else(|_| UserId::random())
    }
}
