//! PostgreSQL-backed `UserRepository` adapter.
//!
//! Every port call checks out one pooled connection and runs inside its own
//! transaction. The transaction commits only when the body returns `Ok`; any
//! error rolls it back and is mapped to the operation's typed error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::{ScopedBoxFuture, ScopedFutureExt as _};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, User, UserId};

use super::models::{NewUserRow, UserRename, UserRow};
use super::pool::DbPool;
use super::schema::users;
use super::user_error_mapping::{UserOperation, map_diesel_error, map_pool_error};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run `body` in a fresh transaction on a pooled connection.
    ///
    /// `name` is the display name being written, used to report schema-level
    /// name conflicts.
    async fn in_transaction<'a, T, F>(
        &self,
        operation: UserOperation,
        name: Option<&DisplayName>,
        body: F,
    ) -> Result<T, UserPersistenceError>
    where
        F: for<'r> FnOnce(
                &'r mut AsyncPgConnection,
            ) -> ScopedBoxFuture<'a, 'r, Result<T, DieselError>>
            + Send
            + 'a,
        T: Send + 'a,
    {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, operation))?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction(body).await.map_err(|err| {
            let mapped = map_diesel_error(err, operation, name);
            debug!(%operation, kind = mapped.kind(), "transaction rolled back");
            mapped
        })
    }
}

/// Zero affected rows means the target vanished; fail so the transaction
/// rolls back.
fn require_affected(affected: usize) -> Result<(), DieselError> {
    if affected == 0 {
        Err(DieselError::NotFound)
    } else {
        Ok(())
    }
}

fn id_of(user: &User) -> &str {
    user.id().as_ref()
}

fn name_of(user: &User) -> &str {
    user.display_name().as_ref()
}

fn row_to_user(row: UserRow, operation: UserOperation) -> Result<User, UserPersistenceError> {
    User::try_from_strings(&row.id, &row.name).map_err(|err| {
        warn!(user_id = %row.id, error = %err, "stored user row failed validation");
        operation.failure(format!("stored user row is invalid: {err}"))
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let operation = UserOperation::FindById;
        let id: &str = id.as_ref();
        let row = self
            .in_transaction(operation, None, |conn| {
                async move {
                    users::table
                        .filter(users::id.eq(id))
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await?;

        row.map(|row| row_to_user(row, operation)).transpose()
    }

    async fn find_by_name(
        &self,
        name: &DisplayName,
    ) -> Result<Option<User>, UserPersistenceError> {
        let operation = UserOperation::FindByName;
        let name: &str = name.as_ref();
        let row = self
            .in_transaction(operation, None, |conn| {
                async move {
                    users::table
                        .filter(users::name.eq(name))
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await?;

        row.map(|row| row_to_user(row, operation)).transpose()
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.in_transaction(UserOperation::Save, Some(user.display_name()), |conn| {
            async move {
                let row = NewUserRow {
                    id: id_of(user),
                    name: name_of(user),
                };
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.in_transaction(UserOperation::Update, Some(user.display_name()), |conn| {
            async move {
                let changes = UserRename {
                    name: name_of(user),
                };
                let affected = diesel::update(users::table.filter(users::id.eq(id_of(user))))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                require_affected(affected)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.in_transaction(UserOperation::Delete, None, |conn| {
            async move {
                let affected = diesel::delete(users::table.filter(users::id.eq(id_of(user))))
                    .execute(conn)
                    .await?;
                require_affected(affected)
            }
            .scope_boxed()
        })
        .await
    }
}
