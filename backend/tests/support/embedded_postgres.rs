//! Database helpers for suites running against embedded PostgreSQL.
//!
//! Every test gets a throwaway database cloned from a migrated template, so
//! the schema is built once per migration set rather than once per test. The
//! template name carries a hash of `migrations/`, which retires stale
//! templates when a migration changes. Table surgery goes through the
//! `postgres` client so Diesel transaction semantics never get in the way.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use user_registry::outbound::persistence::run_migrations;
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "registry_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn connect(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))
}

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the migrated template on `cluster` unless it already exists.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        migrate_schema(&cluster.connection().database_url(&template))?;
    }
    Ok(template)
}

fn provision_attempt(cluster: &ClusterHandle, attempt: usize) -> Result<TemporaryDatabase, String> {
    let template = ensure_template_database(cluster)
        .map_err(|err| format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"))?;
    let name = format!("registry_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(name.as_str(), template.as_str())
        .map_err(|err| format!("clone template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}"))
}

/// A fresh, migrated database on `cluster`, dropped with the returned guard.
///
/// Cloning retries briefly because PostgreSQL refuses to copy a template
/// while another session is connected to it.
pub fn provision_template_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::new();
    for attempt in 1..=PROVISION_RETRIES {
        match provision_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(err) => last_error = err,
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Apply the embedded migrations to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<usize, String> {
    run_migrations(url).map_err(|err| err.to_string())
}

/// Drop the `users` table to simulate schema loss.
pub fn drop_users_table(url: &str) -> Result<(), String> {
    let mut client = connect(url)?;
    client
        .batch_execute("DROP TABLE IF EXISTS users;")
        .map_err(|err| format_postgres_error(&err))
}

/// Number of rows in `users`.
pub fn count_users(url: &str) -> Result<i64, String> {
    let mut client = connect(url)?;
    let row = client
        .query_one("SELECT COUNT(*) FROM users", &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}
