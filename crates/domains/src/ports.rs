//! # Port Traits
//!
//! Store contracts implemented by adapter crates. Methods that touch more
//! than one row (vote casts, cascade deletes) are atomic: they commit
//! entirely or not at all, and callers never observe counters diverging
//! from the vote rows backing them.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Comment, CommentDraft, CommentView, Movie, MovieDraft, MovieSort, Reply, ReplyDraft, Role,
    User, UserDraft, Vote, VoteKind, VoteTally, VoteTarget,
};

/// Persistence contract for the movie catalog.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Fails with `Conflict` when the title is already taken.
    async fn insert(&self, draft: MovieDraft) -> Result<Movie>;
    async fn get(&self, id: i64) -> Result<Option<Movie>>;
    async fn list(&self, sort: MovieSort) -> Result<Vec<Movie>>;
    /// Case-insensitive title substring search.
    async fn search(&self, query: &str) -> Result<Vec<Movie>>;
    async fn update(&self, id: i64, draft: MovieDraft) -> Result<Movie>;
    /// Deletes the movie and, transitively, its comments, replies and votes.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, draft: UserDraft) -> Result<User>;
    async fn get(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn set_role(&self, id: i64, role: Role) -> Result<()>;
    /// Deletes the account and everything it authored or voted on.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Persistence contract for the comment/reply trees.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, draft: CommentDraft) -> Result<Comment>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>>;
    /// One page of a movie's comments, most-recent-first (descending id),
    /// each with its author and direct replies (and their authors) already
    /// attached. An offset past the end yields an empty page.
    async fn list_page(&self, movie_id: i64, offset: i64, limit: i64) -> Result<Vec<CommentView>>;
    async fn count_for_movie(&self, movie_id: i64) -> Result<i64>;
    async fn set_comment_text(&self, id: i64, text: &str) -> Result<()>;
    /// Deletes the comment, its replies, and every vote referencing any of
    /// them, in one transaction.
    async fn delete_comment(&self, id: i64) -> Result<()>;

    async fn insert_reply(&self, draft: ReplyDraft) -> Result<Reply>;
    async fn get_reply(&self, id: i64) -> Result<Option<Reply>>;
    async fn set_reply_text(&self, id: i64, text: &str) -> Result<()>;
    /// Deletes the reply and the votes referencing it, in one transaction.
    async fn delete_reply(&self, id: i64) -> Result<()>;

    // Profile views.
    async fn comments_by_author(&self, user_id: i64) -> Result<Vec<Comment>>;
    async fn replies_by_author(&self, user_id: i64) -> Result<Vec<Reply>>;
}

/// Persistence contract for the vote ledger.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Applies the like/dislike toggle against `target` for `user_id` and
    /// returns the post-mutation tally. Exactly one of insert / delete /
    /// update happens to the vote ledger per call, together with the
    /// matching counter adjustment, inside one transaction. Counters floor
    /// at zero. Unknown targets fail with `NotFound`.
    async fn cast(&self, user_id: i64, target: VoteTarget, kind: VoteKind) -> Result<VoteTally>;

    async fn find(&self, user_id: i64, target: VoteTarget) -> Result<Option<Vote>>;

    /// Number of persisted vote rows for the target; invariants require it
    /// to equal `likes_count + dislikes_count` between calls.
    async fn count_for_target(&self, target: VoteTarget) -> Result<i64>;
}

/// Contract for the password-hashing collaborator. The scheme is chosen by
/// the adapter; the domain only ever sees opaque hash strings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}
