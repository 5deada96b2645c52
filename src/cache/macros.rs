/// A macro to simplify read-through caching of recommendation feeds.
///
/// Checks the cache first and returns the cached value on a hit. On a miss
/// or a cache read failure, executes the provided block to compute the
/// value, stores it in the cache in the background, and returns it. A cache
/// outage therefore degrades to recomputation instead of failing the
/// request.
///
/// # Arguments
/// * `$cache`: The cache instance. Must have `get_from_cache` and
///   `set_in_background` methods.
/// * `$key`: The key to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The future producing the value when it is not cached.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            other => {
                if let Err(e) = other {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, recomputing");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
