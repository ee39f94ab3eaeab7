//! JSON API for FilmSay.
//!
//! Thin orchestration between HTTP and the application services: extract
//! the actor from the bearer token, hand typed input to the service, map
//! the domain error taxonomy onto status codes. No business rules live
//! here.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the application router. Mounted at `/` so the binary can nest
/// it under a prefix if it ever needs to.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/movies", get(handlers::list_movies).post(handlers::create_movie))
        .route(
            "/api/movies/{id}",
            get(handlers::get_movie).put(handlers::update_movie).delete(handlers::delete_movie),
        )
        .route(
            "/api/movies/{id}/comments",
            get(handlers::list_comments).post(handlers::post_comment),
        )
        .route("/api/comments/{id}/replies", post(handlers::post_reply))
        .route(
            "/api/comments/{id}",
            patch(handlers::edit_comment).delete(handlers::delete_comment),
        )
        .route("/api/replies/{id}", patch(handlers::edit_reply).delete(handlers::delete_reply))
        .route("/api/vote", post(handlers::cast_vote))
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/{id}", delete(handlers::delete_user))
        .route("/api/users/{id}/role", post(handlers::assign_role))
        .route("/api/users/{id}/profile", get(handlers::user_profile))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
