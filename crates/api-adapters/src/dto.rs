//! Request and response bodies.
//!
//! Wire strings that map onto domain enums (`vote_type`, `target`, `role`,
//! `sort`) stay raw here and are parsed in the handlers, so malformed
//! values flow through the domain error mapping instead of a generic
//! deserialization rejection.

use serde::{Deserialize, Serialize};

use domains::{CommentView, Movie, UserSummary, VoteTally};
use services::UserProfile;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Deserialize, Default)]
pub struct MovieListQuery {
    pub sort: Option<String>,
    /// Title substring search; takes precedence over `sort` when present.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetail {
    pub movie: Movie,
    pub comments: Vec<CommentView>,
    pub total_comments: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct OffsetQuery {
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CommentsPage {
    pub comments: Vec<CommentView>,
    pub total: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
    pub rating: Option<f64>,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub text: String,
    /// When set, the new reply nests under this reply instead of attaching
    /// directly to the comment in the path.
    pub parent_reply_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// `"comment-<id>"` or `"reply-<id>"`.
    pub target: String,
    /// `"like"` or `"dislike"`.
    pub vote_type: String,
}

pub type VoteResponse = VoteTally;

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

pub type ProfileResponse = UserProfile;
