/// A macro to memoize an optional async lookup in a [`Cache`](crate::cache::Cache).
///
/// If the key is present, the cached value is returned without running the block.
/// Otherwise the block is awaited; a `Some` result is stored under the key before being
/// returned, while `None` is passed through uncached so a later call can try again.
///
/// # Arguments
/// * `$cache`: The cache instance. Must have `get_from_cache` and `set_in_cache` methods.
/// * `$key`: The [`CacheKey`](crate::cache::CacheKey) to read and write.
/// * `$block`: A future resolving to `Option<String>`.
///
/// # Example
/// ```rust,ignore
/// let poster = cached!(cache, key, async move { lookup_poster(title).await });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        if let Some(hit) = $cache.get_from_cache(&$key).await {
            tracing::debug!(key = %$key, "Cache hit");
            Some(hit)
        } else {
            tracing::debug!(key = %$key, "Cache miss");
            match $block.await {
                Some(value) => {
                    $cache.set_in_cache(&$key, value.clone()).await;
                    Some(value)
                }
                None => None,
            }
        }
    }};
}
