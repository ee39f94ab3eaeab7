//! `VoteStore` over SQLite: the atomic like/dislike toggle.
//!
//! The whole cast (existing-vote lookup, ledger mutation, counter
//! adjustment, tally re-read) happens inside one transaction. Counter
//! changes are relative (`counter = MAX(0, counter - 1)`), never computed
//! from values read before the transaction, so two concurrent casts on the
//! same target cannot lose an increment.

use async_trait::async_trait;
use sqlx::Row;

use domains::{DomainError, Result, Vote, VoteKind, VoteStore, VoteTally, VoteTarget};

use super::{db_err, SqliteStore};

/// (counter table, vote fk column, entity name, id) for a target.
fn target_columns(target: VoteTarget) -> (&'static str, &'static str, &'static str, i64) {
    match target {
        VoteTarget::Comment(id) => ("comments", "comment_id", "comment", id),
        VoteTarget::Reply(id) => ("replies", "reply_id", "reply", id),
    }
}

fn counter_column(kind: VoteKind) -> &'static str {
    match kind {
        VoteKind::Like => "likes_count",
        VoteKind::Dislike => "dislikes_count",
    }
}

#[async_trait]
impl VoteStore for SqliteStore {
    async fn cast(&self, user_id: i64, target: VoteTarget, kind: VoteKind) -> Result<VoteTally> {
        let (table, fk, entity, target_id) = target_columns(target);
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let exists: Option<i64> = sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE id = ?"))
            .bind(target_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        if exists.is_none() {
            return Err(DomainError::not_found(entity, target_id));
        }

        let existing = sqlx::query(&format!(
            "SELECT id, vote_type FROM votes WHERE user_id = ? AND {fk} = ?"
        ))
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        match existing {
            None => {
                sqlx::query(&format!(
                    "INSERT INTO votes (user_id, {fk}, vote_type) VALUES (?, ?, ?)"
                ))
                .bind(user_id)
                .bind(target_id)
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

                let counter = counter_column(kind);
                sqlx::query(&format!(
                    "UPDATE {table} SET {counter} = {counter} + 1 WHERE id = ?"
                ))
                .bind(target_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
            Some(row) => {
                let vote_id: i64 = row.get("id");
                let current: String = row.get("vote_type");
                let current: VoteKind = current.parse()?;

                if current == kind {
                    // Toggle-off: same kind twice nets out to nothing.
                    sqlx::query("DELETE FROM votes WHERE id = ?")
                        .bind(vote_id)
                        .execute(&mut *tx)
                        .await
                        .map_err(db_err)?;

                    let counter = counter_column(kind);
                    sqlx::query(&format!(
                        "UPDATE {table} SET {counter} = MAX(0, {counter} - 1) WHERE id = ?"
                    ))
                    .bind(target_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err)?;
                } else {
                    // Switch: move the single vote row to the other side.
                    sqlx::query("UPDATE votes SET vote_type = ? WHERE id = ?")
                        .bind(kind.as_str())
                        .bind(vote_id)
                        .execute(&mut *tx)
                        .await
                        .map_err(db_err)?;

                    let old = counter_column(current);
                    let new = counter_column(kind);
                    sqlx::query(&format!(
                        "UPDATE {table} SET {old} = MAX(0, {old} - 1), {new} = {new} + 1 WHERE id = ?"
                    ))
                    .bind(target_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err)?;
                }
            }
        }

        let row = sqlx::query(&format!(
            "SELECT likes_count, dislikes_count FROM {table} WHERE id = ?"
        ))
        .bind(target_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;
        let tally = VoteTally { likes: row.get("likes_count"), dislikes: row.get("dislikes_count") };

        tx.commit().await.map_err(db_err)?;
        Ok(tally)
    }

    async fn find(&self, user_id: i64, target: VoteTarget) -> Result<Option<Vote>> {
        let (_, fk, _, target_id) = target_columns(target);
        let row = sqlx::query(&format!(
            "SELECT id, vote_type FROM votes WHERE user_id = ? AND {fk} = ?"
        ))
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|row| {
            let kind: String = row.get("vote_type");
            Ok(Vote { id: row.get("id"), user_id, target, kind: kind.parse()? })
        })
        .transpose()
    }

    async fn count_for_target(&self, target: VoteTarget) -> Result<i64> {
        let (_, fk, _, target_id) = target_columns(target);
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM votes WHERE {fk} = ?"))
            .bind(target_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_comment, seed_movie, seed_user, store};
    use super::*;
    use domains::{CommentStore, ReplyDraft, Role};

    async fn fixture() -> (SqliteStore, i64, i64) {
        let s = store().await;
        let author = seed_user(&s, "author@example.com", Role::User).await;
        let voter = seed_user(&s, "voter@example.com", Role::User).await;
        let movie = seed_movie(&s, "Alien").await;
        let comment = seed_comment(&s, movie.id, author.id).await;
        (s, voter.id, comment.id)
    }

    #[tokio::test]
    async fn first_vote_inserts_and_increments() {
        let (s, voter, comment) = fixture().await;
        let tally = s.cast(voter, VoteTarget::Comment(comment), VoteKind::Like).await.unwrap();
        assert_eq!(tally, VoteTally { likes: 1, dislikes: 0 });
        assert!(s.find(voter, VoteTarget::Comment(comment)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn same_kind_twice_is_a_toggle_off() {
        let (s, voter, comment) = fixture().await;
        let target = VoteTarget::Comment(comment);

        s.cast(voter, target, VoteKind::Like).await.unwrap();
        let tally = s.cast(voter, target, VoteKind::Like).await.unwrap();

        assert_eq!(tally, VoteTally { likes: 0, dislikes: 0 });
        assert!(s.find(voter, target).await.unwrap().is_none());
        assert_eq!(s.count_for_target(target).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn switching_kind_moves_one_each_way_and_keeps_one_row() {
        let (s, voter, comment) = fixture().await;
        let target = VoteTarget::Comment(comment);

        s.cast(voter, target, VoteKind::Like).await.unwrap();
        let tally = s.cast(voter, target, VoteKind::Dislike).await.unwrap();

        assert_eq!(tally, VoteTally { likes: 0, dislikes: 1 });
        assert_eq!(s.count_for_target(target).await.unwrap(), 1);
        let vote = s.find(voter, target).await.unwrap().unwrap();
        assert_eq!(vote.kind, VoteKind::Dislike);
    }

    #[tokio::test]
    async fn tally_always_matches_the_ledger_for_multiple_voters() {
        let (s, voter, comment) = fixture().await;
        let other = seed_user(&s, "other@example.com", Role::User).await;
        let target = VoteTarget::Comment(comment);

        s.cast(voter, target, VoteKind::Like).await.unwrap();
        s.cast(other.id, target, VoteKind::Like).await.unwrap();
        let tally = s.cast(other.id, target, VoteKind::Dislike).await.unwrap();

        assert_eq!(tally, VoteTally { likes: 1, dislikes: 1 });
        assert_eq!(
            s.count_for_target(target).await.unwrap(),
            tally.likes + tally.dislikes
        );
    }

    #[tokio::test]
    async fn counters_floor_at_zero_even_when_forced_stale() {
        let (s, voter, comment) = fixture().await;
        let target = VoteTarget::Comment(comment);
        s.cast(voter, target, VoteKind::Like).await.unwrap();

        // Simulate an out-of-band counter reset; removing the vote must
        // not drive the counter negative.
        sqlx::query("UPDATE comments SET likes_count = 0 WHERE id = ?")
            .bind(comment)
            .execute(s.pool())
            .await
            .unwrap();

        let tally = s.cast(voter, target, VoteKind::Like).await.unwrap();
        assert_eq!(tally.likes, 0);
    }

    #[tokio::test]
    async fn votes_on_replies_use_the_reply_counters() {
        let (s, voter, comment) = fixture().await;
        let reply = s
            .insert_reply(ReplyDraft {
                comment_id: comment,
                parent_id: None,
                author_id: voter,
                text: "hot take".into(),
            })
            .await
            .unwrap();

        let tally = s.cast(voter, VoteTarget::Reply(reply.id), VoteKind::Dislike).await.unwrap();
        assert_eq!(tally, VoteTally { likes: 0, dislikes: 1 });

        // The root comment's counters are untouched.
        let c = s.get_comment(comment).await.unwrap().unwrap();
        assert_eq!((c.likes_count, c.dislikes_count), (0, 0));
    }

    #[tokio::test]
    async fn casting_on_a_missing_target_is_not_found() {
        let (s, voter, _) = fixture().await;
        let err = s.cast(voter, VoteTarget::Comment(999), VoteKind::Like).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = s.cast(voter, VoteTarget::Reply(999), VoteKind::Like).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
