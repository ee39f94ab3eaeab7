//! Application services for FilmSay.
//!
//! The three core pieces live here: the voting engine ([`votes`]), the
//! threading engine ([`comments`]) and the access policy ([`policy`]),
//! alongside the movie catalog and account services. Services validate and
//! authorize before any mutation, then delegate the atomic unit of work to
//! the store ports.

pub mod comments;
pub mod movies;
pub mod policy;
pub mod users;
pub mod votes;

pub use comments::{CommentService, COMMENTS_PER_PAGE};
pub use movies::MovieService;
pub use users::{UserProfile, UserService};
pub use votes::VoteService;
