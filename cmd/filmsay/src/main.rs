//! FilmSay server binary: wires the SQLite store, the Argon2 hasher and
//! the session table into the services, then serves the JSON API.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use api_adapters::{router, AppState};
use auth_adapters::{Argon2Hasher, SessionStore};
use configs::AppConfig;
use domains::{CommentStore, CredentialHasher, MovieStore, UserStore, VoteStore};
use services::{CommentService, MovieService, UserService, VoteService};
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let store = Arc::new(
        SqliteStore::connect(&config.database.url)
            .await
            .with_context(|| format!("opening database {}", config.database.url))?,
    );

    let movie_store: Arc<dyn MovieStore> = store.clone();
    let comment_store: Arc<dyn CommentStore> = store.clone();
    let vote_store: Arc<dyn VoteStore> = store.clone();
    let user_store: Arc<dyn UserStore> = store.clone();
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);

    let state = AppState {
        movies: MovieService::new(movie_store.clone()),
        comments: CommentService::new(comment_store.clone(), movie_store),
        votes: VoteService::new(vote_store),
        users: UserService::new(user_store, comment_store, hasher),
        sessions: Arc::new(SessionStore::new()),
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "filmsay listening");

    axum::serve(listener, router(state)).await.context("server error")?;
    Ok(())
}
