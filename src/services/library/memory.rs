use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{ListStatus, UserMovie},
    services::library::{sort_newest_first, LibraryStore},
};

type Key = (String, i32);

/// In-process library, keyed by (user, movie)
///
/// Used by tests and by local runs without a database.
#[derive(Clone, Default)]
pub struct MemoryLibraryStore {
    records: Arc<RwLock<HashMap<Key, UserMovie>>>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list(&self, user_id: &str, status: ListStatus) -> Vec<UserMovie> {
        let records = self.records.read().await;
        let mut found: Vec<UserMovie> = records
            .values()
            .filter(|r| r.user_id == user_id && r.status == status)
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        found
    }
}

#[async_trait::async_trait]
impl LibraryStore for MemoryLibraryStore {
    async fn watched(&self, user_id: &str) -> AppResult<Vec<UserMovie>> {
        Ok(self.list(user_id, ListStatus::Watched).await)
    }

    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<UserMovie>> {
        Ok(self.list(user_id, ListStatus::Watchlisted).await)
    }

    async fn get(&self, user_id: &str, movie_id: i32) -> AppResult<Option<UserMovie>> {
        let records = self.records.read().await;
        Ok(records.get(&(user_id.to_string(), movie_id)).cloned())
    }

    async fn upsert(&self, record: UserMovie) -> AppResult<UserMovie> {
        let mut records = self.records.write().await;
        records.insert((record.user_id.clone(), record.movie_id), record.clone());
        Ok(record)
    }

    async fn set_status(
        &self,
        user_id: &str,
        movie_id: i32,
        status: ListStatus,
    ) -> AppResult<Option<UserMovie>> {
        let mut records = self.records.write().await;
        Ok(records
            .get_mut(&(user_id.to_string(), movie_id))
            .map(|record| {
                record.set_status(status);
                record.clone()
            }))
    }

    async fn remove(&self, user_id: &str, movie_id: i32, status: ListStatus) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let key = (user_id.to_string(), movie_id);
        match records.get(&key) {
            Some(record) if record.status == status => {
                records.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear(&self, user_id: &str) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|(owner, _), _| owner != user_id);
        Ok((before - records.len()) as u64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
