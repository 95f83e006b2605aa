//! Environment-based configuration for the server binary.

use std::env;

/// The environment variable holding the cookie signing/encryption secret.
pub const SECRET_ENV_VAR: &str = "SPENDLOG_SECRET";
/// The environment variable holding the SQLite database path.
pub const DATABASE_ENV_VAR: &str = "SPENDLOG_DB";
/// The environment variable holding the canonical local timezone name.
pub const TIMEZONE_ENV_VAR: &str = "SPENDLOG_TIMEZONE";

const DEFAULT_SECRET: &str = "insecure-dev-secret";
const DEFAULT_DATABASE_PATH: &str = "spendlog.db";
const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Settings read from the environment, with hardcoded fallbacks for
/// development so the server starts without any setup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The secret used to derive the cookie signing/encryption key.
    pub secret: String,
    /// File path to the SQLite database.
    pub database_path: String,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Logs a warning when the default secret is used, since cookies signed
    /// with a publicly known key can be forged.
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|name| env::var(name).ok());

        if config.secret == DEFAULT_SECRET {
            tracing::warn!(
                "{SECRET_ENV_VAR} is not set, using the default secret. \
                Do not do this in production."
            );
        }

        config
    }

    fn from_lookup(get_var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            secret: get_var(SECRET_ENV_VAR).unwrap_or_else(|| DEFAULT_SECRET.to_owned()),
            database_path: get_var(DATABASE_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_owned()),
            local_timezone: get_var(TIMEZONE_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_owned()),
        }
    }
}

#[cfg(test)]
mod config_tests {
    use super::{Config, DATABASE_ENV_VAR, SECRET_ENV_VAR, TIMEZONE_ENV_VAR};

    #[test]
    fn uses_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.secret, "insecure-dev-secret");
        assert_eq!(config.database_path, "spendlog.db");
        assert_eq!(config.local_timezone, "Etc/UTC");
    }

    #[test]
    fn reads_variables_when_set() {
        let config = Config::from_lookup(|name| match name {
            SECRET_ENV_VAR => Some("hunter2".to_owned()),
            DATABASE_ENV_VAR => Some("/tmp/expenses.db".to_owned()),
            TIMEZONE_ENV_VAR => Some("Pacific/Auckland".to_owned()),
            _ => None,
        });

        assert_eq!(
            config,
            Config {
                secret: "hunter2".to_owned(),
                database_path: "/tmp/expenses.db".to_owned(),
                local_timezone: "Pacific/Auckland".to_owned(),
            }
        );
    }
}
