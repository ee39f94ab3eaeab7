//! `UserStore` over SQLite.
//!
//! Account deletion is the one cascade that must also rebalance counters:
//! the departing user's outstanding votes disappear, so the targets they
//! voted on are decremented in the same transaction. Votes *on* the user's
//! own comments and replies vanish together with their targets and need no
//! rebalancing.

use async_trait::async_trait;
use sqlx::Row;

use domains::{DomainError, Result, Role, User, UserDraft, UserStore};

use super::{db_err, SqliteStore};

pub(super) fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let role: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        role: role.parse::<Role>()?,
    })
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert(&self, draft: UserDraft) -> Result<User> {
        let res = sqlx::query("INSERT INTO users (email, name, password_hash, role) VALUES (?, ?, ?, ?)")
            .bind(&draft.email)
            .bind(&draft.name)
            .bind(&draft.password_hash)
            .bind(draft.role.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(User {
            id: res.last_insert_rowid(),
            email: draft.email,
            name: draft.name,
            password_hash: draft.password_hash,
            role: draft.role,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(user_from_row).collect()
    }

    async fn set_role(&self, id: i64, role: Role) -> Result<()> {
        let res = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("user", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Take back the user's own votes from targets that survive them.
        for (table, fk, counter, kind) in [
            ("comments", "comment_id", "likes_count", "like"),
            ("comments", "comment_id", "dislikes_count", "dislike"),
            ("replies", "reply_id", "likes_count", "like"),
            ("replies", "reply_id", "dislikes_count", "dislike"),
        ] {
            sqlx::query(&format!(
                "UPDATE {table} SET {counter} = MAX(0, {counter} - 1)
                 WHERE id IN (SELECT {fk} FROM votes
                              WHERE user_id = ? AND vote_type = ? AND {fk} IS NOT NULL)"
            ))
            .bind(id)
            .bind(kind)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        sqlx::query("DELETE FROM votes WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        // Authored comments and replies (and votes on them) fall to the
        // ON DELETE CASCADE chain.
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("user", id));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}
