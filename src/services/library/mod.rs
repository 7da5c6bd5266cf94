//! Personal library storage
//!
//! A user's library is a set of [`UserMovie`] records, at most one per
//! `(user_id, movie_id)` pair. Every backend upserts on that key: adding a movie
//! that is already on a list overwrites the record instead of duplicating it.
//! Concurrent writers to the same pair are not coordinated; the last write wins.
use crate::{
    error::AppResult,
    models::{ListStatus, Movie, UserMovie},
};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemoryLibraryStore;
pub use self::postgres::PgLibraryStore;
pub use self::redis::RedisLibraryStore;

/// Persistence for the watched and watchlist lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    /// Watched movies, most recently added or moved first
    async fn watched(&self, user_id: &str) -> AppResult<Vec<UserMovie>>;

    /// Watchlisted movies, newest first
    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<UserMovie>>;

    async fn get(&self, user_id: &str, movie_id: i32) -> AppResult<Option<UserMovie>>;

    /// Stores the record, replacing any existing one for the same pair
    async fn upsert(&self, record: UserMovie) -> AppResult<UserMovie>;

    /// Changes the status of an existing record and stamps `updated_at`,
    /// `None` if there is none
    async fn set_status(
        &self,
        user_id: &str,
        movie_id: i32,
        status: ListStatus,
    ) -> AppResult<Option<UserMovie>>;

    /// Deletes the record if it currently has `status`
    async fn remove(&self, user_id: &str, movie_id: i32, status: ListStatus) -> AppResult<bool>;

    /// Deletes every record of a user, returning how many were removed
    async fn clear(&self, user_id: &str) -> AppResult<u64>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;

    async fn add_to_watchlist(&self, user_id: &str, movie: &Movie) -> AppResult<UserMovie> {
        self.upsert(UserMovie::new(user_id, movie, ListStatus::Watchlisted))
            .await
    }

    async fn add_to_watched(&self, user_id: &str, movie: &Movie) -> AppResult<UserMovie> {
        self.upsert(UserMovie::new(user_id, movie, ListStatus::Watched))
            .await
    }

    /// Moves a movie from the watchlist (or nowhere) to watched
    async fn mark_watched(&self, user_id: &str, movie_id: i32) -> AppResult<Option<UserMovie>> {
        self.set_status(user_id, movie_id, ListStatus::Watched).await
    }

    async fn remove_from_watchlist(&self, user_id: &str, movie_id: i32) -> AppResult<bool> {
        self.remove(user_id, movie_id, ListStatus::Watchlisted).await
    }

    async fn remove_from_watched(&self, user_id: &str, movie_id: i32) -> AppResult<bool> {
        self.remove(user_id, movie_id, ListStatus::Watched).await
    }
}

/// Most recently written first, ties by movie id so listings are stable
pub(crate) fn sort_newest_first(records: &mut [UserMovie]) {
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
}
