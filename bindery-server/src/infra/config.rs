//! Server configuration: defaults layered under `BINDERY_*` environment
//! variables, with CLI flags applied on top by `main`.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),

    #[error("no database URL configured; set DATABASE_URL or pass --database-url")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Apply embedded migrations on startup.
    pub run_migrations: bool,
}

impl Config {
    /// Defaults overlaid with `BINDERY_*` environment variables
    /// (`BINDERY_SERVER__PORT=8080` style nesting).
    pub fn load() -> Result<Self, ConfigLoadError> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8660_i64)?
            .set_default("database.run_migrations", true)?
            .add_source(
                config::Environment::with_prefix("BINDERY").separator("__"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// The configured database URL, required outside demo mode.
    pub fn require_database_url(&self) -> Result<&str, ConfigLoadError> {
        self.database
            .url
            .as_deref()
            .ok_or(ConfigLoadError::MissingDatabaseUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_without_environment() {
        let config = Config::load().expect("defaults should deserialize");
        assert!(!config.server.host.is_empty());
        assert_ne!(config.server.port, 0);
        assert!(config.database.run_migrations);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8660,
            },
            database: DatabaseConfig {
                url: None,
                run_migrations: true,
            },
        };
        assert!(matches!(
            config.require_database_url(),
            Err(ConfigLoadError::MissingDatabaseUrl)
        ));
    }
}
