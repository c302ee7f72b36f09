use crate::{
    cache::{Cache, CacheKey},
    cached,
    models::{ImageResult, MediaKind},
    parser::{alphanumeric_only, simplify},
    services::{placeholder::PlaceholderGenerator, providers::TitleLookup},
};

type TitleVariant = fn(&str) -> Option<String>;

/// Lookup candidates, tried in order until one yields a poster
const TITLE_VARIANTS: &[(&str, TitleVariant)] = &[
    ("exact", exact_title),
    ("before_colon", simplify),
    ("alphanumeric", alphanumeric_title),
];

fn exact_title(title: &str) -> Option<String> {
    Some(title.to_string())
}

fn alphanumeric_title(title: &str) -> Option<String> {
    let simplified = alphanumeric_only(title);
    (!simplified.is_empty() && simplified != title).then_some(simplified)
}

/// Memoized title → poster URL resolution
///
/// Only successes are cached; a title with no poster is looked up again next time.
#[derive(Clone, Default)]
pub struct PosterCache {
    cache: Cache,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a poster URL for `title`, consulting the cache first
    ///
    /// With `force_refresh` any cached entry is evicted before the lookup chain runs.
    /// Lookup failures are logged and treated as "not found".
    pub async fn resolve_image<L>(
        &self,
        title: &str,
        kind: MediaKind,
        force_refresh: bool,
        lookup: &L,
    ) -> Option<String>
    where
        L: TitleLookup + ?Sized,
    {
        if title.trim().is_empty() {
            return None;
        }

        let key = CacheKey::poster(kind, title);
        let _guard = self.cache.lock_key(&key).await;

        if force_refresh && self.cache.remove(&key).await.is_some() {
            tracing::debug!(key = %key, "Evicted cached poster for refresh");
        }

        cached!(self.cache, key, lookup_poster(title, kind, lookup))
    }

    /// Drops the cached poster for a title; returns whether one was cached
    pub async fn evict(&self, title: &str, kind: MediaKind) -> bool {
        let key = CacheKey::poster(kind, title);
        let _guard = self.cache.lock_key(&key).await;
        self.cache.remove(&key).await.is_some()
    }

    pub async fn cached(&self, title: &str, kind: MediaKind) -> Option<String> {
        self.cache.get_from_cache(&CacheKey::poster(kind, title)).await
    }
}

async fn lookup_poster<L>(title: &str, kind: MediaKind, lookup: &L) -> Option<String>
where
    L: TitleLookup + ?Sized,
{
    let mut tried: Vec<String> = Vec::with_capacity(TITLE_VARIANTS.len());

    for (variant, candidate) in TITLE_VARIANTS {
        let Some(query) = candidate(title) else {
            continue;
        };
        if tried.contains(&query) {
            continue;
        }

        match lookup.lookup_title(&query).await {
            Ok(Some(item)) => {
                if let Some(url) = item.poster_url() {
                    tracing::info!(
                        title = %title,
                        kind = %kind,
                        variant = variant,
                        query = %query,
                        "Poster resolved"
                    );
                    return Some(url.to_string());
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %title,
                    variant = variant,
                    "Poster lookup failed"
                );
            }
        }

        tried.push(query);
    }

    tracing::debug!(title = %title, kind = %kind, attempts = tried.len(), "No poster found");
    None
}

/// Poster URL when one can be resolved, otherwise a generated placeholder
///
/// `lookup` is `None` when no media manager is configured for the kind.
pub async fn resolve_artwork<L>(
    posters: &PosterCache,
    placeholders: &PlaceholderGenerator,
    title: &str,
    kind: MediaKind,
    force_refresh: bool,
    lookup: Option<&L>,
) -> ImageResult
where
    L: TitleLookup + ?Sized,
{
    let remote = match lookup {
        Some(lookup) => posters.resolve_image(title, kind, force_refresh, lookup).await,
        None => {
            tracing::debug!(kind = %kind, "No title lookup configured, using placeholder");
            None
        }
    };

    match remote {
        Some(url) => ImageResult::Remote(url),
        None => ImageResult::Placeholder(placeholders.fallback_for(title).await),
    }
}
