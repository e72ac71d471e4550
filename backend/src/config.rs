//! Registry settings loaded via OrthoConfig.
//!
//! Values come from `USER_REGISTRY_*` environment variables (and any
//! configuration file OrthoConfig discovers). Unset pool limits fall back to
//! the [`PoolConfig`] defaults.

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Environment variable consulted when no prefixed database URL is set.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Configuration values for connecting to the user store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_REGISTRY")]
pub struct RegistrySettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: Option<u32>,
    /// Idle connections kept open.
    pub min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: Option<u64>,
    /// Apply embedded migrations before running a command.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl RegistrySettings {
    /// Return the configured database URL.
    ///
    /// Prefers the prefixed setting and falls back to `DATABASE_URL`. Blank
    /// values count as unset.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env::var(FALLBACK_DATABASE_URL_VAR).ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Build a pool configuration for `database_url` using these limits.
    pub fn pool_config(&self, database_url: impl Into<String>) -> PoolConfig {
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.max_connections {
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(secs) = self.connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        config
    }
}
