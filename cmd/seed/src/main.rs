//! Bootstrap an admin account.
//!
//! Reads `admin.{email,name,password}` from the configuration (or
//! `FILMSAY__ADMIN__*` env vars), creates the account if it does not
//! exist, and promotes it to admin either way. Idempotent, safe to run
//! on every deploy.

use anyhow::{bail, Context};
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use auth_adapters::Argon2Hasher;
use configs::AppConfig;
use domains::{CredentialHasher, Role, UserDraft, UserStore};
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let Some(email) = config.admin.email.clone() else {
        bail!("FILMSAY__ADMIN__EMAIL is not set");
    };
    let Some(password) = config.admin.password.clone() else {
        bail!("FILMSAY__ADMIN__PASSWORD is not set");
    };
    let name = config.admin.name.clone().unwrap_or_else(|| "Administrator".to_string());

    let store = SqliteStore::connect(&config.database.url)
        .await
        .with_context(|| format!("opening database {}", config.database.url))?;

    let email = email.trim().to_lowercase();
    match store.find_by_email(&email).await? {
        Some(existing) => {
            if existing.role == Role::Admin {
                tracing::info!(user = existing.id, %email, "admin already present");
            } else {
                store.set_role(existing.id, Role::Admin).await?;
                tracing::info!(user = existing.id, %email, "existing account promoted to admin");
            }
        }
        None => {
            let password_hash = Argon2Hasher.hash(password.expose_secret())?;
            let user = UserStore::insert(
                &store,
                UserDraft { email: email.clone(), name, password_hash, role: Role::Admin },
            )
            .await?;
            tracing::info!(user = user.id, %email, "admin account created");
        }
    }

    Ok(())
}
