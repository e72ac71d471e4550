//! Policy for suites that need an embedded PostgreSQL cluster.
//!
//! Suites skip with a `SKIP-TEST-CLUSTER` marker when the cluster cannot be
//! started. `SKIP_TEST_CLUSTER` skips without trying; `REQUIRE_TEST_CLUSTER`
//! turns a setup failure into a test failure so CI breakage is not masked.

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    env_flag("SKIP_TEST_CLUSTER")
}

/// Returns true when `REQUIRE_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn cluster_required() -> bool {
    env_flag("REQUIRE_TEST_CLUSTER")
}

/// Run `setup` unless `SKIP_TEST_CLUSTER` is set, skipping on failure.
///
/// Returns `None` without calling `setup` when the skip flag is truthy, so no
/// cluster bootstrap is attempted.
pub fn with_test_cluster<T>(setup: impl FnOnce() -> Result<T, String>) -> Option<T> {
    run_unless_skipped(should_skip_test_cluster(), setup)
}

fn run_unless_skipped<T>(skip: bool, setup: impl FnOnce() -> Result<T, String>) -> Option<T> {
    if skip {
        eprintln!("SKIP-TEST-CLUSTER: SKIP_TEST_CLUSTER is set");
        return None;
    }
    match setup() {
        Ok(value) => Some(value),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// Report a cluster setup failure and return `None` so the caller can skip.
///
/// # Panics
///
/// Panics when `REQUIRE_TEST_CLUSTER` is truthy.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if cluster_required() {
        panic!("Test cluster setup failed: {reason}. Unset REQUIRE_TEST_CLUSTER to skip.");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const FLAG: &str = "USER_REGISTRY_CLUSTER_FLAG_UNDER_TEST";

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("Yes", true)]
    #[case(" yes ", true)]
    #[case("0", false)]
    #[case("false", false)]
    #[case("no", false)]
    #[case("", false)]
    #[case("on", false)]
    fn flag_values_parse(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_truthy(value), expected);
    }

    #[rstest]
    fn unset_flag_is_false() {
        let _guard = lock_env([(FLAG, None::<String>)]);
        assert!(!env_flag(FLAG));
    }

    #[rstest]
    fn set_flag_is_read_from_the_environment() {
        let _guard = lock_env([(FLAG, Some("1"))]);
        assert!(env_flag(FLAG));
    }

    #[rstest]
    fn skip_flag_bypasses_setup() {
        let called = Cell::new(false);

        let outcome: Option<()> = run_unless_skipped(true, || {
            called.set(true);
            Ok(())
        });

        assert!(outcome.is_none());
        assert!(!called.get());
    }

    #[rstest]
    fn setup_runs_when_not_skipped() {
        assert_eq!(run_unless_skipped(false, || Ok(7)), Some(7));
    }
}
