//! # Domain Models
//!
//! The core entities of FilmSay. Identifiers are opaque `i64` row ids
//! assigned by the store; parent/child links are stored as ids rather than
//! references so the comment/reply trees stay free of ownership cycles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A reviewed movie. `title` is unique across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    /// Synopsis / review body.
    pub body: String,
    /// Kept as free text ("1999", "1999-03-31") to match upstream metadata.
    pub release_date: String,
    pub img_url: Option<String>,
    /// Aggregate rating on a 0-10 scale; not enforced here, the UI clamps.
    pub rating: Option<f64>,
    pub director: Option<String>,
    pub writers: Option<String>,
    pub genres: Option<String>,
}

/// Draft used for movie creation and full-record updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub body: String,
    pub release_date: String,
    pub img_url: Option<String>,
    pub rating: Option<f64>,
    pub director: Option<String>,
    pub writers: Option<String>,
    pub genres: Option<String>,
}

/// Sort orders for the movie listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieSort {
    /// Alphabetical, the default.
    #[default]
    Title,
    /// Highest rated first.
    Rating,
    /// Newest release first.
    ReleaseDate,
}

impl FromStr for MovieSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(MovieSort::Title),
            "rating" => Ok(MovieSort::Rating),
            "date" => Ok(MovieSort::ReleaseDate),
            other => Err(DomainError::Validation(format!("unknown sort order: {other}"))),
        }
    }
}

/// Exactly one role per user at a time; registration defaults to `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Moderators and admins share most management rights.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::Validation(format!("invalid role: {other}"))),
        }
    }
}

/// A registered account. The password hash is opaque to the domain; it is
/// produced and verified through the [`crate::ports::CredentialHasher`] port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Login identity, unique.
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
}

/// Draft for account creation; the password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Author fields attached to listed comments and replies, so readers never
/// need a follow-up user fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        UserSummary { id: u.id, name: u.name.clone(), email: u.email.clone(), role: u.role }
    }
}

/// A comment on a movie. A root comment (`parent_id` absent) carries the
/// author's movie rating; a comment threaded under another comment does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub movie_id: i64,
    pub author_id: i64,
    /// Self-referential comment-to-comment thread link.
    pub parent_id: Option<i64>,
    pub text: String,
    /// 1-10, required iff this is a root comment.
    pub user_rating: Option<f64>,
    /// Denormalized; the vote rows are the source of truth.
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub movie_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub text: String,
    pub user_rating: Option<f64>,
}

/// A reply attached to a root [`Comment`], optionally nested under another
/// reply. Nesting never changes `comment_id`: every reply in a subtree keeps
/// a direct link to its root comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub comment_id: i64,
    /// Self-referential reply-to-reply nesting link.
    pub parent_id: Option<i64>,
    pub author_id: i64,
    pub text: String,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReplyDraft {
    pub comment_id: i64,
    pub parent_id: Option<i64>,
    pub author_id: i64,
    pub text: String,
}

/// Where a new reply attaches: directly to a root comment, or nested under
/// an existing reply (inheriting that reply's root comment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAnchor {
    Comment(i64),
    Reply(i64),
}

/// A comment together with its author and direct replies, as returned by
/// the paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: UserSummary,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyView {
    pub reply: Reply,
    pub author: UserSummary,
}

/// The two vote directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteKind::Like => "like",
            VoteKind::Dislike => "dislike",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(VoteKind::Like),
            "dislike" => Ok(VoteKind::Dislike),
            other => Err(DomainError::Validation(format!("invalid vote type: {other}"))),
        }
    }
}

/// Tagged identifier for the thing a vote refers to. Wire form is
/// `"comment-<id>"` or `"reply-<id>"`; an unknown tag is a validation
/// failure, while a malformed numeric id is treated as a lookup miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VoteTarget {
    Comment(i64),
    Reply(i64),
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTarget::Comment(id) => write!(f, "comment-{id}"),
            VoteTarget::Reply(id) => write!(f, "reply-{id}"),
        }
    }
}

impl FromStr for VoteTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, raw_id) = s
            .split_once('-')
            .ok_or_else(|| DomainError::Validation(format!("invalid vote target: {s}")))?;
        let parse_id = || {
            raw_id
                .parse::<i64>()
                .map_err(|_| DomainError::NotFound(format!("vote target {s}")))
        };
        match tag {
            "comment" => Ok(VoteTarget::Comment(parse_id()?)),
            "reply" => Ok(VoteTarget::Reply(parse_id()?)),
            other => Err(DomainError::Validation(format!("invalid vote target tag: {other}"))),
        }
    }
}

impl TryFrom<String> for VoteTarget {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VoteTarget> for String {
    fn from(t: VoteTarget) -> Self {
        t.to_string()
    }
}

/// One vote row: at most one per (user, target) at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub target: VoteTarget,
    pub kind: VoteKind,
}

/// Post-mutation counters returned by every vote cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub likes: i64,
    pub dislikes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_target_round_trips_through_wire_form() {
        let t: VoteTarget = "comment-42".parse().unwrap();
        assert_eq!(t, VoteTarget::Comment(42));
        assert_eq!(t.to_string(), "comment-42");

        let t: VoteTarget = "reply-7".parse().unwrap();
        assert_eq!(t, VoteTarget::Reply(7));
    }

    #[test]
    fn vote_target_rejects_unknown_tag_as_validation() {
        let err = "post-3".parse::<VoteTarget>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = "nodash".parse::<VoteTarget>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn vote_target_rejects_malformed_id_as_not_found() {
        let err = "comment-abc".parse::<VoteTarget>().unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn role_parsing_and_staff_check() {
        assert_eq!("moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert!(Role::Admin.is_staff());
        assert!(Role::Moderator.is_staff());
        assert!(!Role::User.is_staff());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: 1,
            email: "a@b.c".into(),
            name: "A".into(),
            password_hash: "secret".into(),
            role: Role::User,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
