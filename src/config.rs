//! Process configuration read from environment variables.
//!
//! - `PORT` / `HOST`: bind address (default `0.0.0.0:5000`)
//! - `STORAGE`: `postgres` (default) or `memory`
//! - `DB_USER`, `DB_PASS`: database credentials, required for postgres
//! - `DB_HOST` (default `localhost:5432`), `DB_NAME` (default `workon`),
//!   `DB_MAX_CONNECTIONS` (default 10)
//! - `EMPLOYEE_LOOKUP`: where `/work-records` resolves employee names,
//!   `tasks` (default) or `users`

use std::env;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub employee_lookup: EmployeeLookup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgres(DatabaseConfig),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}",
            self.user, self.password, self.host, self.name
        )
    }
}

/// Collection consulted when `/work-records` resolves an `employeeName`
/// to an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeLookup {
    /// Match the `name` field of task documents.
    #[default]
    Tasks,
    /// Match the `name` field of user documents.
    Users,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), 5000u16)?;

        let storage = match lookup("STORAGE").as_deref() {
            None | Some("postgres") => StorageConfig::Postgres(DatabaseConfig {
                user: lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                password: lookup("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?,
                host: lookup("DB_HOST").unwrap_or_else(|| "localhost:5432".to_string()),
                name: lookup("DB_NAME").unwrap_or_else(|| "workon".to_string()),
                max_connections: parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 10u32)?,
            }),
            Some("memory") => StorageConfig::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    value: other.to_string(),
                })
            }
        };

        let employee_lookup = match lookup("EMPLOYEE_LOOKUP").as_deref() {
            None | Some("tasks") => EmployeeLookup::Tasks,
            Some("users") => EmployeeLookup::Users,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "EMPLOYEE_LOOKUP",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            storage,
            employee_lookup,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
