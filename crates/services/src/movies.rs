//! Movie catalog service. Creation, edits and deletion are staff-only;
//! browsing and search are open.

use std::sync::Arc;

use domains::{DomainError, Movie, MovieDraft, MovieSort, MovieStore, Result, User};

use crate::policy;

#[derive(Clone)]
pub struct MovieService {
    movies: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(movies: Arc<dyn MovieStore>) -> Self {
        Self { movies }
    }

    /// Adds a movie to the catalog. Duplicate titles surface as `Conflict`.
    pub async fn create(&self, actor: &User, draft: MovieDraft) -> Result<Movie> {
        if !policy::can_manage_movie(actor) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to manage movies".into(),
            ));
        }
        validate_draft(&draft)?;
        let movie = self.movies.insert(draft).await?;
        tracing::info!(movie = movie.id, title = %movie.title, actor = actor.id, "movie added");
        Ok(movie)
    }

    pub async fn update(&self, actor: &User, id: i64, draft: MovieDraft) -> Result<Movie> {
        if !policy::can_manage_movie(actor) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to manage movies".into(),
            ));
        }
        validate_draft(&draft)?;
        self.movies.update(id, draft).await
    }

    /// Removes the movie and, transitively, its whole comment tree.
    pub async fn delete(&self, actor: &User, id: i64) -> Result<()> {
        if !policy::can_manage_movie(actor) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to manage movies".into(),
            ));
        }
        self.movies.delete(id).await?;
        tracing::info!(movie = id, actor = actor.id, "movie deleted");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        self.movies
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("movie", id))
    }

    pub async fn list(&self, sort: MovieSort) -> Result<Vec<Movie>> {
        self.movies.list(sort).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.movies.search(query).await
    }
}

fn validate_draft(draft: &MovieDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(DomainError::Validation("movie title cannot be empty".into()));
    }
    if draft.body.trim().is_empty() {
        return Err(DomainError::Validation("movie body cannot be empty".into()));
    }
    Ok(())
}
