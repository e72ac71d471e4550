//! PostgreSQL persistence adapter for users, built on Diesel.
//!
//! - `pool`: `bb8` pool of `diesel-async` connections.
//! - `diesel_user_repository`: the `UserRepository` implementation; one
//!   transaction per call.
//! - `migrations`: embedded schema migrations.
//!
//! Row structs (`models`) and the table definition (`schema`) stay private to
//! this module.
//!
//! ```ignore
//! use user_registry::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let repository = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod user_error_mapping;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_IDLE, DbPool, PoolConfig,
    PoolError,
};
