//! Actor extraction from the `Authorization: Bearer` header.
//!
//! The session store and user lookup happen here so every handler receives
//! an already-verified [`User`]; the services trust it per the domain
//! contract.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use domains::{DomainError, User};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller.
pub struct Actor(pub User);

pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let user_id = state.sessions.resolve(token).ok_or(ApiError::Unauthorized)?;
        // A live token for a deleted account is as good as no token.
        match state.users.get(user_id).await {
            Ok(user) => Ok(Actor(user)),
            Err(DomainError::NotFound(_)) => Err(ApiError::Unauthorized),
            Err(err) => Err(err.into()),
        }
    }
}
