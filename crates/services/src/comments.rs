//! # Threading Engine
//!
//! Creates comments and nested replies, enforces the root-comment rating
//! rule, serves the paginated listing, and drives the cascade deletes.

use std::sync::Arc;

use domains::{
    Comment, CommentDraft, CommentStore, CommentView, DomainError, MovieStore, Reply, ReplyAnchor,
    ReplyDraft, Result, User,
};

use crate::policy;

/// Fixed page size for the comment listing.
pub const COMMENTS_PER_PAGE: i64 = 5;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    movies: Arc<dyn MovieStore>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>, movies: Arc<dyn MovieStore>) -> Self {
        Self { comments, movies }
    }

    /// Posts a comment on a movie.
    ///
    /// A root comment (no `parent_id`) must carry a rating in `[1, 10]`.
    /// When threading under an existing comment the rating is ignored and
    /// stored as absent; the parent must belong to the same movie.
    pub async fn post_comment(
        &self,
        actor: &User,
        movie_id: i64,
        text: &str,
        rating: Option<f64>,
        parent_id: Option<i64>,
    ) -> Result<Comment> {
        let text = non_empty(text, "comment")?;

        self.movies
            .get(movie_id)
            .await?
            .ok_or_else(|| DomainError::not_found("movie", movie_id))?;

        let user_rating = match parent_id {
            Some(parent_id) => {
                let parent = self
                    .comments
                    .get_comment(parent_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("comment", parent_id))?;
                if parent.movie_id != movie_id {
                    return Err(DomainError::Validation(
                        "parent comment belongs to a different movie".into(),
                    ));
                }
                // Threaded comments never carry a rating, even if one was sent.
                None
            }
            None => {
                let rating = rating.ok_or_else(|| {
                    DomainError::Validation("rating is required if this is not a reply".into())
                })?;
                if !(1.0..=10.0).contains(&rating) {
                    return Err(DomainError::Validation(
                        "rating must be between 1 and 10".into(),
                    ));
                }
                Some(rating)
            }
        };

        let comment = self
            .comments
            .insert_comment(CommentDraft {
                movie_id,
                author_id: actor.id,
                parent_id,
                text,
                user_rating,
            })
            .await?;
        tracing::debug!(comment = comment.id, movie = movie_id, author = actor.id, "comment posted");
        Ok(comment)
    }

    /// Posts a reply, attached either directly to a root comment or nested
    /// under an existing reply. Nesting inherits the parent reply's root
    /// comment, so the whole subtree stays reachable from one comment id.
    pub async fn post_reply(&self, actor: &User, anchor: ReplyAnchor, text: &str) -> Result<Reply> {
        let text = non_empty(text, "reply")?;

        let draft = match anchor {
            ReplyAnchor::Reply(parent_id) => {
                let parent = self
                    .comments
                    .get_reply(parent_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("reply", parent_id))?;
                ReplyDraft {
                    comment_id: parent.comment_id,
                    parent_id: Some(parent.id),
                    author_id: actor.id,
                    text,
                }
            }
            ReplyAnchor::Comment(comment_id) => {
                self.comments
                    .get_comment(comment_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("comment", comment_id))?;
                ReplyDraft { comment_id, parent_id: None, author_id: actor.id, text }
            }
        };

        let reply = self.comments.insert_reply(draft).await?;
        tracing::debug!(reply = reply.id, comment = reply.comment_id, author = actor.id, "reply posted");
        Ok(reply)
    }

    /// One page of a movie's comments, most-recent-first, together with the
    /// total count. Each comment arrives with its author and direct replies
    /// eagerly attached. An offset past the end is an empty page, not an
    /// error.
    pub async fn list_page(&self, movie_id: i64, offset: i64) -> Result<(Vec<CommentView>, i64)> {
        self.movies
            .get(movie_id)
            .await?
            .ok_or_else(|| DomainError::not_found("movie", movie_id))?;
        let offset = offset.max(0);
        let page = self.comments.list_page(movie_id, offset, COMMENTS_PER_PAGE).await?;
        let total = self.comments.count_for_movie(movie_id).await?;
        Ok((page, total))
    }

    pub async fn edit_comment(&self, actor: &User, comment_id: i64, text: &str) -> Result<()> {
        let text = non_empty(text, "comment")?;
        let comment = self
            .comments
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;
        if !policy::can_modify_comment(actor, &comment) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to modify this comment".into(),
            ));
        }
        self.comments.set_comment_text(comment_id, &text).await
    }

    /// Deletes a comment together with all its replies and every vote
    /// referencing either, as one atomic unit.
    pub async fn delete_comment(&self, actor: &User, comment_id: i64) -> Result<()> {
        let comment = self
            .comments
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;
        if !policy::can_modify_comment(actor, &comment) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to delete this comment".into(),
            ));
        }
        self.comments.delete_comment(comment_id).await?;
        tracing::info!(comment = comment_id, actor = actor.id, "comment deleted");
        Ok(())
    }

    pub async fn edit_reply(&self, actor: &User, reply_id: i64, text: &str) -> Result<()> {
        let text = non_empty(text, "reply")?;
        let reply = self
            .comments
            .get_reply(reply_id)
            .await?
            .ok_or_else(|| DomainError::not_found("reply", reply_id))?;
        if !policy::can_modify_reply(actor, &reply) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to modify this reply".into(),
            ));
        }
        self.comments.set_reply_text(reply_id, &text).await
    }

    pub async fn delete_reply(&self, actor: &User, reply_id: i64) -> Result<()> {
        let reply = self
            .comments
            .get_reply(reply_id)
            .await?
            .ok_or_else(|| DomainError::not_found("reply", reply_id))?;
        if !policy::can_modify_reply(actor, &reply) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to delete this reply".into(),
            ));
        }
        self.comments.delete_reply(reply_id).await?;
        tracing::info!(reply = reply_id, actor = actor.id, "reply deleted");
        Ok(())
    }
}

fn non_empty(text: &str, what: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{what} text cannot be empty")));
    }
    Ok(trimmed.to_string())
}
