/// Media-manager adapters
///
/// Sonarr and Radarr answer title lookups (with artwork) and list the library; Plex only
/// lists the library. Each concern is its own trait so the poster cache and the
/// recommendation service depend on nothing more than what they call.
use crate::{
    error::AppResult,
    models::{MediaItem, MediaKind},
};

pub mod arr;
pub mod plex;

pub use arr::ArrProvider;
pub use plex::PlexProvider;

/// Looks a title up in an external catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TitleLookup: Send + Sync {
    /// Best match for `title`, or `None` when the catalog has nothing for it
    async fn lookup_title(&self, title: &str) -> AppResult<Option<MediaItem>>;
}

/// A source of titles the user already owns
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LibrarySource: Send + Sync {
    /// Titles of the given kind currently in the library
    async fn library_titles(&self, kind: MediaKind) -> AppResult<Vec<String>>;

    /// Cheap authenticated request proving the base URL and credential work
    async fn test_connection(&self) -> AppResult<()>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
