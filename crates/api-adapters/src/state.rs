//! State shared across all request handlers.

use std::sync::Arc;

use auth_adapters::SessionStore;
use services::{CommentService, MovieService, UserService, VoteService};

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
    pub comments: CommentService,
    pub votes: VoteService,
    pub users: UserService,
    pub sessions: Arc<SessionStore>,
}
