//! `MovieStore` over SQLite.

use async_trait::async_trait;
use sqlx::Row;

use domains::{DomainError, Movie, MovieDraft, MovieSort, MovieStore, Result};

use super::{db_err, SqliteStore};

fn movie_from_row(row: &sqlx::sqlite::SqliteRow) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        release_date: row.get("release_date"),
        img_url: row.get("img_url"),
        rating: row.get("rating"),
        director: row.get("director"),
        writers: row.get("writers"),
        genres: row.get("genres"),
    }
}

#[async_trait]
impl MovieStore for SqliteStore {
    async fn insert(&self, draft: MovieDraft) -> Result<Movie> {
        let res = sqlx::query(
            "INSERT INTO movies (title, body, release_date, img_url, rating, director, writers, genres)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(&draft.release_date)
        .bind(&draft.img_url)
        .bind(draft.rating)
        .bind(&draft.director)
        .bind(&draft.writers)
        .bind(&draft.genres)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Movie {
            id: res.last_insert_rowid(),
            title: draft.title,
            body: draft.body,
            release_date: draft.release_date,
            img_url: draft.img_url,
            rating: draft.rating,
            director: draft.director,
            writers: draft.writers,
            genres: draft.genres,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Movie>> {
        let row = sqlx::query("SELECT * FROM movies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(movie_from_row))
    }

    async fn list(&self, sort: MovieSort) -> Result<Vec<Movie>> {
        let order = match sort {
            MovieSort::Title => "title COLLATE NOCASE ASC",
            // Unrated movies sort last, not first.
            MovieSort::Rating => "rating IS NULL, rating DESC",
            MovieSort::ReleaseDate => "release_date DESC",
        };
        let rows = sqlx::query(&format!("SELECT * FROM movies ORDER BY {order}"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let rows = sqlx::query(
            "SELECT * FROM movies WHERE title LIKE ? COLLATE NOCASE ORDER BY title COLLATE NOCASE",
        )
        .bind(format!("%{query}%"))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn update(&self, id: i64, draft: MovieDraft) -> Result<Movie> {
        let res = sqlx::query(
            "UPDATE movies SET title = ?, body = ?, release_date = ?, img_url = ?,
                    rating = ?, director = ?, writers = ?, genres = ?
             WHERE id = ?",
        )
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(&draft.release_date)
        .bind(&draft.img_url)
        .bind(draft.rating)
        .bind(&draft.director)
        .bind(&draft.writers)
        .bind(&draft.genres)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("movie", id));
        }
        Ok(Movie {
            id,
            title: draft.title,
            body: draft.body,
            release_date: draft.release_date,
            img_url: draft.img_url,
            rating: draft.rating,
            director: draft.director,
            writers: draft.writers,
            genres: draft.genres,
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Foreign keys cascade comments -> replies -> votes, so the single
        // statement removes the whole tree atomically.
        let res = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(DomainError::not_found("movie", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_movie, store};
    use domains::{DomainError, MovieDraft, MovieSort, MovieStore};

    fn draft(title: &str, rating: Option<f64>) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            body: "body".into(),
            release_date: "2001".into(),
            img_url: None,
            rating,
            director: None,
            writers: None,
            genres: None,
        }
    }

    #[tokio::test]
    async fn duplicate_title_is_a_conflict() {
        let s = store().await;
        seed_movie(&s, "Heat").await;
        let err = MovieStore::insert(&s, draft("Heat", None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn listing_sorts_by_rating_with_unrated_last() {
        let s = store().await;
        MovieStore::insert(&s, draft("Unrated", None)).await.unwrap();
        MovieStore::insert(&s, draft("Good", Some(8.0))).await.unwrap();
        MovieStore::insert(&s, draft("Great", Some(9.5))).await.unwrap();

        let titles: Vec<String> = MovieStore::list(&s, MovieSort::Rating)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, ["Great", "Good", "Unrated"]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let s = store().await;
        seed_movie(&s, "The Matrix").await;
        seed_movie(&s, "Matrix Reloaded").await;
        seed_movie(&s, "Heat").await;

        let hits = MovieStore::search(&s, "matrix").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_movie_is_not_found() {
        let s = store().await;
        let err = MovieStore::update(&s, 999, draft("Nope", None)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
