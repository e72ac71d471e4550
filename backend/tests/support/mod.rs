//! Shared helpers for the registry integration suites.
//!
//! Each file under `tests/` compiles as its own crate, so suites pull these in
//! with `mod support;` and use only what they need.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::with_test_cluster;
pub use embedded_postgres::{
    count_users, drop_users_table, migrate_schema, provision_template_database,
};

/// Render a `postgres` error with its SQLSTATE and server message.
///
/// `postgres::Error`'s `Display` collapses server errors to `db error`, which
/// hides the useful part in CI logs.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );

    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }

    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }

    summary
}
