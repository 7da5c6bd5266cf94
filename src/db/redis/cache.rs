use redis::{AsyncCommands, Client};
use std::fmt::Display;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::error::AppResult;

/// Prefix of every key this service writes
const NAMESPACE: &str = "movielens";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One page of a catalog list route, keyed by its query parameters
    CatalogList { route: String, params: String },
}

impl CacheKey {
    /// Builds a list key; parameter order does not matter
    pub fn catalog_list(route: &str, params: &[(&str, String)]) -> Self {
        let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        pairs.sort();

        CacheKey::CatalogList {
            route: route.trim_matches('/').to_string(),
            params: pairs.join("&"),
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::CatalogList { route, params } => {
                write!(f, "{}:catalog:{}?{}", NAMESPACE, route, params)
            }
        }
    }
}

/// Opens a Redis client; no connection is made until first use
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

struct PendingWrite {
    key: String,
    json: String,
    ttl_secs: u64,
}

/// JSON response cache with write-behind
///
/// Reads go straight to Redis. Writes are queued and applied by a single
/// background task, so a slow cache never delays a response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    queue: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the write-behind task once queued writes are flushed
pub struct CacheWriterHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (queue, pending) = mpsc::unbounded_channel();
        let (stop, stopped) = oneshot::channel();

        let task = tokio::spawn(write_behind(redis_client.clone(), pending, stopped));

        (
            Self {
                redis_client,
                queue,
            },
            CacheWriterHandle { stop, task },
        )
    }

    /// Cached value for `key`
    ///
    /// An entry that no longer decodes into `T` counts as a miss, so a type
    /// change only costs one refetch.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        Ok(cached.and_then(|json| match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }))
    }

    /// Queues `value` to be stored under `key` for `ttl_secs`
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl_secs,
        };
        if self.queue.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, write dropped");
        }
    }
}

async fn write_behind(
    client: Client,
    mut pending: mpsc::UnboundedReceiver<PendingWrite>,
    mut stopped: oneshot::Receiver<()>,
) {
    tracing::debug!("Cache writer started");

    loop {
        tokio::select! {
            write = pending.recv() => match write {
                Some(write) => apply(&client, vec![write]).await,
                None => break,
            },
            _ = &mut stopped => {
                let mut backlog = Vec::new();
                while let Ok(write) = pending.try_recv() {
                    backlog.push(write);
                }
                let flushed = backlog.len();
                apply(&client, backlog).await;
                tracing::info!(flushed, "Cache writer stopped");
                break;
            }
        }
    }
}

/// Writes a batch in one pipeline; failures are logged, never retried
async fn apply(client: &Client, writes: Vec<PendingWrite>) {
    if writes.is_empty() {
        return;
    }

    let mut pipe = redis::pipe();
    for write in &writes {
        pipe.set_ex(&write.key, &write.json, write.ttl_secs).ignore();
    }

    let result: AppResult<()> = async {
        let mut conn = client.get_multiplexed_async_connection().await?;
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        tracing::error!(count = writes.len(), error = %e, "Failed to write to Redis cache");
    }
}
