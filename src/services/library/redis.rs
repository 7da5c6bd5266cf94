use redis::{AsyncCommands, Client};

use crate::{
    error::AppResult,
    models::{ListStatus, UserMovie},
    services::library::{sort_newest_first, LibraryStore},
};

/// Document-style library store
///
/// Each user owns one hash, `library:{user_id}`, with one JSON document per
/// movie id. `HSET` replaces the document for a movie, so a second add can
/// never create a duplicate.
#[derive(Clone)]
pub struct RedisLibraryStore {
    redis_client: Client,
}

fn library_key(user_id: &str) -> String {
    format!("library:{}", user_id)
}

impl RedisLibraryStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        Ok(self.redis_client.get_multiplexed_async_connection().await?)
    }

    async fn list(&self, user_id: &str, status: ListStatus) -> AppResult<Vec<UserMovie>> {
        let mut conn = self.connection().await?;
        let documents: Vec<String> = conn.hvals(library_key(user_id)).await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let record: UserMovie = serde_json::from_str(&document)?;
            if record.status == status {
                records.push(record);
            }
        }
        sort_newest_first(&mut records);

        Ok(records)
    }

    async fn write(
        conn: &mut redis::aio::MultiplexedConnection,
        record: &UserMovie,
    ) -> AppResult<()> {
        let document = serde_json::to_string(record)?;
        let _: () = conn
            .hset(library_key(&record.user_id), record.movie_id, document)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl LibraryStore for RedisLibraryStore {
    async fn watched(&self, user_id: &str) -> AppResult<Vec<UserMovie>> {
        self.list(user_id, ListStatus::Watched).await
    }

    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<UserMovie>> {
        self.list(user_id, ListStatus::Watchlisted).await
    }

    async fn get(&self, user_id: &str, movie_id: i32) -> AppResult<Option<UserMovie>> {
        let mut conn = self.connection().await?;
        let document: Option<String> = conn.hget(library_key(user_id), movie_id).await?;

        match document {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: UserMovie) -> AppResult<UserMovie> {
        let mut conn = self.connection().await?;
        Self::write(&mut conn, &record).await?;

        tracing::debug!(
            user_id = %record.user_id,
            movie_id = record.movie_id,
            status = record.status.as_str(),
            "Library document written"
        );

        Ok(record)
    }

    async fn set_status(
        &self,
        user_id: &str,
        movie_id: i32,
        status: ListStatus,
    ) -> AppResult<Option<UserMovie>> {
        let Some(mut record) = self.get(user_id, movie_id).await? else {
            return Ok(None);
        };

        record.set_status(status);
        let mut conn = self.connection().await?;
        Self::write(&mut conn, &record).await?;

        Ok(Some(record))
    }

    async fn remove(&self, user_id: &str, movie_id: i32, status: ListStatus) -> AppResult<bool> {
        match self.get(user_id, movie_id).await? {
            Some(record) if record.status == status => {
                let mut conn = self.connection().await?;
                let removed: u64 = conn.hdel(library_key(user_id), movie_id).await?;
                Ok(removed > 0)
            }
            _ => Ok(false),
        }
    }

    async fn clear(&self, user_id: &str) -> AppResult<u64> {
        let mut conn = self.connection().await?;
        let key = library_key(user_id);
        let count: u64 = conn.hlen(&key).await?;
        let _: () = conn.del(&key).await?;
        Ok(count)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    #[test]
    fn test_library_key() {
        assert_eq!(library_key("alice"), "library:alice");
    }

    #[test]
    fn test_document_format() {
        let movie = Movie::local("Garage Band Doc", vec!["Music".to_string()]);
        let record = UserMovie::new("alice", &movie, ListStatus::Watched);

        let document = serde_json::to_value(&record).unwrap();
        assert_eq!(document["user_id"], "alice");
        assert_eq!(document["status"], "watched");
        assert_eq!(document["genres"][0], "Music");

        let back: UserMovie = serde_json::from_value(document).unwrap();
        assert_eq!(back, record);
    }

    // Needs a live Redis; run with `cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_mark_watched_twice_keeps_one_document() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let store = RedisLibraryStore::new(Client::open(redis_url).unwrap());
        let movie = Movie::local("Redis Test Movie", vec![]);

        store.clear("redis-test-user").await.unwrap();
        store.add_to_watchlist("redis-test-user", &movie).await.unwrap();
        store.add_to_watchlist("redis-test-user", &movie).await.unwrap();
        store.mark_watched("redis-test-user", movie.id).await.unwrap();
        store.mark_watched("redis-test-user", movie.id).await.unwrap();

        assert_eq!(store.watched("redis-test-user").await.unwrap().len(), 1);
        assert!(store.watchlist("redis-test-user").await.unwrap().is_empty());
        assert_eq!(store.clear("redis-test-user").await.unwrap(), 1);
    }
}
