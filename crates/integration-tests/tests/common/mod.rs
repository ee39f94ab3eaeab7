//! Shared fixture: the full service stack over a fresh in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use auth_adapters::Argon2Hasher;
use domains::{
    CommentStore, CredentialHasher, Movie, MovieDraft, MovieStore, Role, User, UserDraft,
    UserStore, VoteStore,
};
use services::{CommentService, MovieService, UserService, VoteService};
use storage_adapters::SqliteStore;

pub struct App {
    pub store: Arc<SqliteStore>,
    pub movies: MovieService,
    pub comments: CommentService,
    pub votes: VoteService,
    pub users: UserService,
}

pub async fn app() -> App {
    let store = Arc::new(
        SqliteStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store"),
    );

    let movie_store: Arc<dyn MovieStore> = store.clone();
    let comment_store: Arc<dyn CommentStore> = store.clone();
    let vote_store: Arc<dyn VoteStore> = store.clone();
    let user_store: Arc<dyn UserStore> = store.clone();
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);

    App {
        movies: MovieService::new(movie_store.clone()),
        comments: CommentService::new(comment_store.clone(), movie_store),
        votes: VoteService::new(vote_store),
        users: UserService::new(user_store, comment_store, hasher),
        store,
    }
}

/// Inserts an account directly, bypassing registration. The hash is a
/// placeholder; tests that exercise login go through `UserService::register`
/// instead.
pub async fn user(app: &App, email: &str, role: Role) -> User {
    UserStore::insert(
        app.store.as_ref(),
        UserDraft {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or("user").to_string(),
            password_hash: "hash".into(),
            role,
        },
    )
    .await
    .expect("seed user")
}

pub async fn movie(app: &App, staff: &User, title: &str) -> Movie {
    app.movies
        .create(
            staff,
            MovieDraft {
                title: title.to_string(),
                body: "a film worth arguing about".into(),
                release_date: "1999".into(),
                img_url: None,
                rating: Some(7.5),
                director: None,
                writers: None,
                genres: None,
            },
        )
        .await
        .expect("seed movie")
}
