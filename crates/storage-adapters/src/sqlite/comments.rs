//! `CommentStore` over SQLite.
//!
//! The paginated listing joins authors in and fetches the page's replies
//! with one additional query, so rendering a page never goes back to the
//! store per row.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite};

use domains::{
    Comment, CommentDraft, CommentStore, CommentView, DomainError, Reply, ReplyDraft, ReplyView,
    Result, Role, UserSummary,
};

use super::{db_err, SqliteStore};

pub(super) fn comment_from_row(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        movie_id: row.get("movie_id"),
        author_id: row.get("author_id"),
        parent_id: row.get("parent_id"),
        text: row.get("text"),
        user_rating: row.get("user_rating"),
        likes_count: row.get("likes_count"),
        dislikes_count: row.get("dislikes_count"),
        created_at: row.get("created_at"),
    }
}

pub(super) fn reply_from_row(row: &sqlx::sqlite::SqliteRow) -> Reply {
    Reply {
        id: row.get("id"),
        comment_id: row.get("comment_id"),
        parent_id: row.get("parent_id"),
        author_id: row.get("author_id"),
        text: row.get("text"),
        likes_count: row.get("likes_count"),
        dislikes_count: row.get("dislikes_count"),
        created_at: row.get("created_at"),
    }
}

fn author_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserSummary> {
    let role: String = row.get("author_role");
    Ok(UserSummary {
        id: row.get("author_id"),
        name: row.get("author_name"),
        email: row.get("author_email"),
        role: role.parse::<Role>()?,
    })
}

#[async_trait]
impl CommentStore for SqliteStore {
    async fn insert_comment(&self, draft: CommentDraft) -> Result<Comment> {
        let created_at = chrono::Utc::now();
        let res = sqlx::query(
            "INSERT INTO comments (movie_id, author_id, parent_id, text, user_rating, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(draft.movie_id)
        .bind(draft.author_id)
        .bind(draft.parent_id)
        .bind(&draft.text)
        .bind(draft.user_rating)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Comment {
            id: res.last_insert_rowid(),
            movie_id: draft.movie_id,
            author_id: draft.author_id,
            parent_id: draft.parent_id,
            text: draft.text,
            user_rating: draft.user_rating,
            likes_count: 0,
            dislikes_count: 0,
            created_at,
        })
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(comment_from_row))
    }

    async fn list_page(&self, movie_id: i64, offset: i64, limit: i64) -> Result<Vec<CommentView>> {
        let comment_rows = sqlx::query(
            "SELECT c.*, u.name AS author_name, u.email AS author_email, u.role AS author_role
             FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.movie_id = ?
             ORDER BY c.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(movie_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        if comment_rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = comment_rows.iter().map(|r| r.get("id")).collect();

        // One query for every reply on the page, oldest first within a
        // comment.
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT r.*, u.name AS author_name, u.email AS author_email, u.role AS author_role
             FROM replies r JOIN users u ON u.id = r.author_id
             WHERE r.comment_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY r.id ASC");
        let reply_rows = qb.build().fetch_all(&self.pool).await.map_err(db_err)?;

        let mut replies_by_comment: HashMap<i64, Vec<ReplyView>> = HashMap::new();
        for row in &reply_rows {
            let reply = reply_from_row(row);
            let author = author_from_row(row)?;
            replies_by_comment
                .entry(reply.comment_id)
                .or_default()
                .push(ReplyView { reply, author });
        }

        comment_rows
            .iter()
            .map(|row| {
                let comment = comment_from_row(row);
                let author = author_from_row(row)?;
                let replies = replies_by_comment.remove(&comment.id).unwrap_or_default();
                Ok(CommentView { comment, author, replies })
            })
            .collect()
    }

    async fn count_for_movie(&self, movie_id: i64) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE movie_id = ?")
            .bind(movie_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn set_comment_text(&self, id: i64, text: &str) -> Result<()> {
        let res = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("comment", id));
        }
        Ok(())
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM votes WHERE comment_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        sqlx::query(
            "DELETE FROM votes WHERE reply_id IN (SELECT id FROM replies WHERE comment_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        sqlx::query("DELETE FROM replies WHERE comment_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        // Threaded child comments fall to the parent_id cascade.
        let res = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("comment", id));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn insert_reply(&self, draft: ReplyDraft) -> Result<Reply> {
        let created_at = chrono::Utc::now();
        let res = sqlx::query(
            "INSERT INTO replies (comment_id, parent_id, author_id, text, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(draft.comment_id)
        .bind(draft.parent_id)
        .bind(draft.author_id)
        .bind(&draft.text)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Reply {
            id: res.last_insert_rowid(),
            comment_id: draft.comment_id,
            parent_id: draft.parent_id,
            author_id: draft.author_id,
            text: draft.text,
            likes_count: 0,
            dislikes_count: 0,
            created_at,
        })
    }

    async fn get_reply(&self, id: i64) -> Result<Option<Reply>> {
        let row = sqlx::query("SELECT * FROM replies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(reply_from_row))
    }

    async fn set_reply_text(&self, id: i64, text: &str) -> Result<()> {
        let res = sqlx::query("UPDATE replies SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("reply", id));
        }
        Ok(())
    }

    async fn delete_reply(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM votes WHERE reply_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        // Nested child replies and their votes fall to the cascades.
        let res = sqlx::query("DELETE FROM replies WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("reply", id));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn comments_by_author(&self, user_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT * FROM comments WHERE author_id = ? ORDER BY id DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn replies_by_author(&self, user_id: i64) -> Result<Vec<Reply>> {
        let rows = sqlx::query("SELECT * FROM replies WHERE author_id = ? ORDER BY id DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(reply_from_row).collect())
    }
}
