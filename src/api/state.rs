use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::MediaKind,
    parser::RecommendationParser,
    services::{
        llm::{CompletionSettings, OpenAiClient},
        providers::{ArrProvider, LibrarySource, PlexProvider, TitleLookup},
        CompletionClient, PlaceholderGenerator, PosterCache,
    },
};

/// Shared application state
///
/// Adapters are optional: each one exists only when its base URL and credential are
/// configured. The caches live as long as the state does.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub parser: Arc<RecommendationParser>,
    pub completions: Option<Arc<dyn CompletionClient>>,
    pub series_lookup: Option<Arc<dyn TitleLookup>>,
    pub movie_lookup: Option<Arc<dyn TitleLookup>>,
    pub series_library: Option<Arc<dyn LibrarySource>>,
    pub movie_library: Option<Arc<dyn LibrarySource>>,
    pub plex: Option<Arc<dyn LibrarySource>>,
    pub posters: PosterCache,
    pub placeholders: PlaceholderGenerator,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Creates a state with empty caches and no adapters
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            parser: Arc::new(RecommendationParser::default()),
            completions: None,
            series_lookup: None,
            movie_lookup: None,
            series_library: None,
            movie_library: None,
            plex: None,
            posters: PosterCache::new(),
            placeholders: PlaceholderGenerator::new(),
        }
    }

    /// Creates a state with every adapter whose credentials are configured
    pub fn from_config(config: Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let mut state = Self::new(config.clone());

        match config.openai() {
            Ok(credentials) => {
                state.completions = Some(Arc::new(OpenAiClient::new(
                    http_client.clone(),
                    credentials,
                    CompletionSettings::from(&config),
                )));
            }
            Err(e) => tracing::info!(reason = %e, "Completion client disabled"),
        }

        match config.sonarr() {
            Ok(credentials) => {
                let sonarr = Arc::new(ArrProvider::sonarr(http_client.clone(), credentials));
                state.series_lookup = Some(sonarr.clone());
                state.series_library = Some(sonarr);
            }
            Err(e) => tracing::info!(reason = %e, "Sonarr adapter disabled"),
        }

        match config.radarr() {
            Ok(credentials) => {
                let radarr = Arc::new(ArrProvider::radarr(http_client.clone(), credentials));
                state.movie_lookup = Some(radarr.clone());
                state.movie_library = Some(radarr);
            }
            Err(e) => tracing::info!(reason = %e, "Radarr adapter disabled"),
        }

        match config.plex() {
            Ok(credentials) => {
                state.plex = Some(Arc::new(PlexProvider::new(http_client, credentials)));
            }
            Err(e) => tracing::info!(reason = %e, "Plex adapter disabled"),
        }

        Ok(state)
    }

    pub fn with_completions(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completions = Some(client);
        self
    }

    pub fn with_title_lookup(mut self, kind: MediaKind, lookup: Arc<dyn TitleLookup>) -> Self {
        match kind {
            MediaKind::Series => self.series_lookup = Some(lookup),
            MediaKind::Movie => self.movie_lookup = Some(lookup),
        }
        self
    }

    pub fn with_library(mut self, kind: MediaKind, source: Arc<dyn LibrarySource>) -> Self {
        match kind {
            MediaKind::Series => self.series_library = Some(source),
            MediaKind::Movie => self.movie_library = Some(source),
        }
        self
    }

    pub fn with_plex(mut self, source: Arc<dyn LibrarySource>) -> Self {
        self.plex = Some(source);
        self
    }

    pub fn completions(&self) -> AppResult<&dyn CompletionClient> {
        self.completions.as_deref().ok_or_else(|| {
            AppError::Configuration("Completion API key is not configured".to_string())
        })
    }

    pub fn title_lookup(&self, kind: MediaKind) -> Option<&dyn TitleLookup> {
        match kind {
            MediaKind::Series => self.series_lookup.as_deref(),
            MediaKind::Movie => self.movie_lookup.as_deref(),
        }
    }

    /// Sonarr for series or Radarr for movies, falling back to Plex
    pub fn library_for(&self, kind: MediaKind) -> AppResult<&dyn LibrarySource> {
        let managed = match kind {
            MediaKind::Series => self.series_library.as_deref(),
            MediaKind::Movie => self.movie_library.as_deref(),
        };

        managed.or(self.plex.as_deref()).ok_or_else(|| {
            AppError::Configuration(format!("No library source configured for {} titles", kind))
        })
    }

    /// Adapter answering connection tests for a service name
    pub fn connection_source(&self, service: &str) -> AppResult<&dyn LibrarySource> {
        let source = match service {
            "sonarr" => self.series_library.as_deref(),
            "radarr" => self.movie_library.as_deref(),
            "plex" => self.plex.as_deref(),
            other => return Err(AppError::NotFound(format!("Unknown service: {}", other))),
        };

        source.ok_or_else(|| AppError::Configuration(format!("{} is not configured", service)))
    }
}
