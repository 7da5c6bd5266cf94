use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{ListStatus, UserMovie},
    services::library::LibraryStore,
};

const COLUMNS: &str = "user_id, movie_id, title, poster_path, overview, release_date, \
                       vote_average, genres, status, added_at, updated_at";

/// Relational library store, one `user_movies` row per (user, movie)
#[derive(Clone)]
pub struct PgLibraryStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct UserMovieRow {
    user_id: String,
    movie_id: i32,
    title: String,
    poster_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    genres: Vec<String>,
    status: String,
    added_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserMovieRow> for UserMovie {
    type Error = AppError;

    fn try_from(row: UserMovieRow) -> AppResult<Self> {
        let status = ListStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown list status '{}' for {}:{}",
                row.status, row.user_id, row.movie_id
            ))
        })?;

        Ok(UserMovie {
            user_id: row.user_id,
            movie_id: row.movie_id,
            title: row.title,
            poster_path: row.poster_path,
            overview: row.overview,
            release_date: row.release_date,
            vote_average: row.vote_average,
            genres: row.genres,
            status,
            added_at: row.added_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list(&self, user_id: &str, status: ListStatus) -> AppResult<Vec<UserMovie>> {
        let sql = format!(
            "SELECT {} FROM user_movies WHERE user_id = $1 AND status = $2 \
             ORDER BY updated_at DESC, movie_id ASC",
            COLUMNS
        );
        let rows: Vec<UserMovieRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserMovie::try_from).collect()
    }
}

#[async_trait::async_trait]
impl LibraryStore for PgLibraryStore {
    async fn watched(&self, user_id: &str) -> AppResult<Vec<UserMovie>> {
        self.list(user_id, ListStatus::Watched).await
    }

    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<UserMovie>> {
        self.list(user_id, ListStatus::Watchlisted).await
    }

    async fn get(&self, user_id: &str, movie_id: i32) -> AppResult<Option<UserMovie>> {
        let sql = format!(
            "SELECT {} FROM user_movies WHERE user_id = $1 AND movie_id = $2",
            COLUMNS
        );
        let row: Option<UserMovieRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserMovie::try_from).transpose()
    }

    async fn upsert(&self, record: UserMovie) -> AppResult<UserMovie> {
        sqlx::query(
            r#"
            INSERT INTO user_movies
                (user_id, movie_id, title, poster_path, overview, release_date,
                 vote_average, genres, status, added_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id, movie_id) DO UPDATE SET
                title = EXCLUDED.title,
                poster_path = EXCLUDED.poster_path,
                overview = EXCLUDED.overview,
                release_date = EXCLUDED.release_date,
                vote_average = EXCLUDED.vote_average,
                genres = EXCLUDED.genres,
                status = EXCLUDED.status,
                added_at = EXCLUDED.added_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&record.user_id)
        .bind(record.movie_id)
        .bind(&record.title)
        .bind(&record.poster_path)
        .bind(&record.overview)
        .bind(&record.release_date)
        .bind(record.vote_average)
        .bind(&record.genres)
        .bind(record.status.as_str())
        .bind(record.added_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            user_id = %record.user_id,
            movie_id = record.movie_id,
            status = record.status.as_str(),
            "Library record upserted"
        );

        Ok(record)
    }

    async fn set_status(
        &self,
        user_id: &str,
        movie_id: i32,
        status: ListStatus,
    ) -> AppResult<Option<UserMovie>> {
        let sql = format!(
            "UPDATE user_movies SET status = $3, updated_at = now() WHERE user_id = $1 AND movie_id = $2 \
             RETURNING {}",
            COLUMNS
        );
        let row: Option<UserMovieRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(movie_id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserMovie::try_from).transpose()
    }

    async fn remove(&self, user_id: &str, movie_id: i32, status: ListStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_movies WHERE user_id = $1 AND movie_id = $2 AND status = $3",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_movies WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
