//! Embedded PostgreSQL bootstrap for the registry integration suites.
//!
//! One cluster serves every test in a binary: `shared_cluster` starts it on
//! first use through `pg-embed-setup-unpriv`'s shared handle, and tests carve
//! out their own databases from it.
//!
//! The library installs binaries and data under `/var/tmp` by default. When
//! `PG_RUNTIME_DIR` or `PG_DATA_DIR` is unset, bootstrap points both at a
//! unique directory under the target dir instead, holding an `env-lock` guard
//! for the duration of the call.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static CLUSTER: OnceLock<&'static ClusterHandle> = OnceLock::new();

/// Extra attempts after a transient bootstrap failure.
const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubles on each attempt.
const RETRY_DELAY_MS: u64 = 500;

const TRANSIENT_PATTERNS: [&str; 8] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "timeout",
    "temporarily unavailable",
    "dns error",
    "failed to lookup",
];

fn scratch_root() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"))
        .join("pg-embed")
}

fn create_scratch_dirs() -> Result<(String, String), String> {
    let base = scratch_root().join(format!("registry-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;
    std::fs::create_dir_all(&data_dir).map_err(|err| err.to_string())?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

fn is_transient(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// The process-wide cluster, started on first call.
///
/// Transient download failures are retried with backoff; later calls return
/// the running cluster immediately.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    if let Some(cluster) = CLUSTER.get() {
        return Ok(*cluster);
    }
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    if let Some(cluster) = CLUSTER.get() {
        return Ok(*cluster);
    }

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_override {
        let (runtime_dir, data_dir) = create_scratch_dirs()?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match shared_cluster_handle() {
            Ok(cluster) => return Ok(*CLUSTER.get_or_init(|| cluster)),
            Err(err) => {
                last_error = err.to_string();
                if attempt == MAX_RETRIES || !is_transient(&last_error) {
                    break;
                }
                let delay = Duration::from_millis(RETRY_DELAY_MS << attempt);
                eprintln!(
                    "pg-embed: attempt {}/{} failed, retrying in {delay:?}: {last_error}",
                    attempt + 1,
                    MAX_RETRIES + 1
                );
                std::thread::sleep(delay);
            }
        }
    }

    Err(last_error)
}
