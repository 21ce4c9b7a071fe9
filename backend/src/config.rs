//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `GYM_*` environment variables or a configuration file;
//! the CLI may still override the database URL with `--database-url`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/gym";

/// Settings for connecting to PostgreSQL and for log output.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GYM")]
pub struct GymSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections the pool keeps open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: Option<u64>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

impl GymSettings {
    /// Configured connection URL.
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    /// Pool configuration for `database_url`, falling back to pool defaults
    /// for unset values.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.pool_min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(secs) = self.connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "GYM_DATABASE_URL",
        "GYM_POOL_MAX_SIZE",
        "GYM_POOL_MIN_IDLE",
        "GYM_CONNECTION_TIMEOUT_SECS",
        "GYM_LOG_JSON",
    ];

    fn load_from_empty_args() -> GymSettings {
        GymSettings::load_from_iter([OsString::from("gym")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert!(!settings.log_json);
        assert_eq!(
            settings.pool_config(settings.database_url()),
            PoolConfig::new(DEFAULT_DATABASE_URL)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("GYM_DATABASE_URL", Some("postgres://db/gym_test".to_owned())),
            ("GYM_POOL_MAX_SIZE", Some("4".to_owned())),
            ("GYM_POOL_MIN_IDLE", Some("1".to_owned())),
            ("GYM_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
            ("GYM_LOG_JSON", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), "postgres://db/gym_test");
        assert!(settings.log_json);
        let pool = settings.pool_config(settings.database_url());
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.min_idle(), Some(1));
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
    }
}
