//! Layered configuration for the FilmSay binaries.
//!
//! Sources, later ones winning: built-in defaults, an optional
//! `filmsay.toml` next to the binary, then `FILMSAY__*` environment
//! variables (`FILMSAY__SERVER__PORT=9000`). `.env` loading is the
//! binary's job (`dotenvy`), so library consumers stay side-effect free.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite:filmsay.db`.
    pub url: String,
}

/// Credentials for the `seed` binary's bootstrap admin. Only read there;
/// the server never looks at them.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite:filmsay.db")?
            .set_default("admin.email", None::<String>)?
            .set_default("admin.name", None::<String>)?
            .set_default("admin.password", None::<String>)?
            .add_source(config::File::with_name("filmsay").required(false))
            .add_source(
                config::Environment::with_prefix("FILMSAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        let parsed: AppConfig = cfg.try_deserialize()?;
        tracing::debug!(host = %parsed.server.host, port = parsed.server.port, "configuration loaded");
        Ok(parsed)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
