//! # Voting Engine
//!
//! Applies the like/dislike toggle to a comment or reply. The three
//! branches (first vote, toggle-off, switch) and the counter updates are
//! one atomic unit inside [`domains::VoteStore::cast`]; this service owns
//! the surrounding validation and authorization.

use std::sync::Arc;

use domains::{Result, User, VoteKind, VoteStore, VoteTally, VoteTarget};

#[derive(Clone)]
pub struct VoteService {
    votes: Arc<dyn VoteStore>,
}

impl VoteService {
    pub fn new(votes: Arc<dyn VoteStore>) -> Self {
        Self { votes }
    }

    /// Casts `kind` on `target` for `actor` and returns the post-mutation
    /// tally. Casting the same kind twice in a row nets out to nothing
    /// (toggle-off); casting the other kind switches the vote. Unknown
    /// targets fail with `NotFound`.
    ///
    /// Target tags and vote-type strings are rejected earlier, at parse
    /// time, by the `FromStr` impls on [`VoteTarget`] and [`VoteKind`].
    pub async fn cast(&self, actor: &User, target: VoteTarget, kind: VoteKind) -> Result<VoteTally> {
        let tally = self.votes.cast(actor.id, target, kind).await?;
        tracing::debug!(
            actor = actor.id,
            target = %target,
            kind = %kind,
            likes = tally.likes,
            dislikes = tally.dislikes,
            "vote cast"
        );
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{DomainError, MockVoteStore, Role};

    fn actor(id: i64) -> User {
        User {
            id,
            email: format!("u{id}@example.com"),
            name: "voter".into(),
            password_hash: String::new(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn cast_returns_the_store_tally() {
        let mut store = MockVoteStore::new();
        store
            .expect_cast()
            .withf(|user_id, target, kind| {
                *user_id == 7 && *target == VoteTarget::Comment(3) && *kind == VoteKind::Like
            })
            .returning(|_, _, _| Ok(VoteTally { likes: 1, dislikes: 0 }));

        let svc = VoteService::new(Arc::new(store));
        let tally = svc.cast(&actor(7), VoteTarget::Comment(3), VoteKind::Like).await.unwrap();
        assert_eq!(tally, VoteTally { likes: 1, dislikes: 0 });
    }

    #[tokio::test]
    async fn cast_propagates_not_found_for_missing_targets() {
        let mut store = MockVoteStore::new();
        store
            .expect_cast()
            .returning(|_, _, _| Err(DomainError::not_found("reply", 99)));

        let svc = VoteService::new(Arc::new(store));
        let err = svc.cast(&actor(1), VoteTarget::Reply(99), VoteKind::Dislike).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
