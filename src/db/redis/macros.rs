/// Read-through caching against an optional Redis cache.
///
/// With `Some(cache)`, a hit returns the cached value. On a miss the block is
/// awaited, its value queued for a background write and returned. A cache
/// that cannot be read is logged and bypassed; it never fails the call.
/// With `None` the block is simply awaited.
///
/// # Arguments
/// * `$cache`: `Option<&Cache>`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing `AppResult<T>` on a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache.as_ref(), key, LIST_CACHE_TTL, async {
///     self.request_list(route, &params).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;

        let hit = match cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, bypassing");
                    None
                }
            },
            None => None,
        };

        match hit {
            Some(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(value)
            }
            None => {
                let value = $block.await?;
                if let Some(cache) = cache {
                    cache.set_in_background(&key, &value, $ttl);
                }
                Ok(value)
            }
        }
    }};
}
