//! SQLite implementation of the store ports.
//!
//! One [`SqliteStore`] implements all four port traits over a shared pool.
//! Every multi-row mutation runs inside a single transaction, and counter
//! updates are expressed as relative SQL (`likes_count = MAX(0,
//! likes_count - 1)`) so concurrent writers can never resurrect stale
//! values read outside the transaction.

mod comments;
mod movies;
mod users;
mod votes;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use domains::{DomainError, Result};

/// Schema, applied idempotently at connect time. Foreign keys carry
/// `ON DELETE CASCADE` as a second line of defence behind the explicit
/// cascade transactions; the unique vote indexes back the one-vote-per-
/// (user, target) invariant at the storage level.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL UNIQUE,
    body         TEXT NOT NULL,
    release_date TEXT NOT NULL,
    img_url      TEXT,
    rating       REAL,
    director     TEXT,
    writers      TEXT,
    genres       TEXT
);

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'user'
);

CREATE TABLE IF NOT EXISTS comments (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id       INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
    author_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    parent_id      INTEGER REFERENCES comments(id) ON DELETE CASCADE,
    text           TEXT NOT NULL,
    user_rating    REAL,
    likes_count    INTEGER NOT NULL DEFAULT 0,
    dislikes_count INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS replies (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    comment_id     INTEGER NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
    parent_id      INTEGER REFERENCES replies(id) ON DELETE CASCADE,
    author_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    text           TEXT NOT NULL,
    likes_count    INTEGER NOT NULL DEFAULT 0,
    dislikes_count INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE,
    reply_id   INTEGER REFERENCES replies(id) ON DELETE CASCADE,
    vote_type  TEXT NOT NULL,
    CHECK ((comment_id IS NULL) <> (reply_id IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_comments_movie ON comments(movie_id);
CREATE INDEX IF NOT EXISTS idx_replies_comment ON replies(comment_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_votes_user_comment
    ON votes(user_id, comment_id) WHERE comment_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_votes_user_reply
    ON votes(user_id, reply_id) WHERE reply_id IS NOT NULL;
"#;

/// Shared SQLite-backed store. Clones share the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies the
    /// schema. Foreign-key enforcement is switched on for every
    /// connection; the cascade transactions rely on it for nested
    /// comment/reply subtrees.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database exists per connection, so the pool must
        // not open a second one.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_err)?;
        tracing::debug!(url, "sqlite store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Maps driver errors into the domain taxonomy. Unique violations become
/// `Conflict` so duplicate titles/emails surface instead of being
/// swallowed; everything else is `Internal`.
pub(crate) fn db_err(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return DomainError::Conflict(db.message().to_string());
        }
    }
    DomainError::Internal(err.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SqliteStore;
    use domains::{
        Comment, CommentDraft, CommentStore, Movie, MovieDraft, MovieStore, Role, User, UserDraft,
        UserStore,
    };

    pub async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.expect("in-memory store")
    }

    pub async fn seed_user(store: &SqliteStore, email: &str, role: Role) -> User {
        UserStore::insert(
            store,
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

    pub async fn seed_movie(store: &SqliteStore, title: &str) -> Movie {
        MovieStore::insert(
            store,
            MovieDraft {
                title: title.to_string(),
                body: "a film".into(),
                release_date: "1999".into(),
                img_url: None,
                rating: Some(7.0),
                director: None,
                writers: None,
                genres: None,
            },
        )
        .await
        .expect("seed movie")
    }

    pub async fn seed_comment(store: &SqliteStore, movie_id: i64, author_id: i64) -> Comment {
        store
            .insert_comment(CommentDraft {
                movie_id,
                author_id,
                parent_id: None,
                text: "worth watching".into(),
                user_rating: Some(8.0),
            })
            .await
            .expect("seed comment")
    }
}
