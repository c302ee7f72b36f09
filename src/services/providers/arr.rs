/// Sonarr / Radarr API v3 adapter
///
/// Both applications expose the same shape of API; only the resource name differs
/// (`series` vs `movie`). Authentication is the `X-Api-Key` header.
use crate::{
    config::ServiceCredentials,
    error::{AppError, AppResult},
    models::{ArrLibraryItem, ArrSystemStatus, MediaItem, MediaKind},
    services::providers::{LibrarySource, TitleLookup},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrFlavor {
    Sonarr,
    Radarr,
}

impl ArrFlavor {
    fn resource(&self) -> &'static str {
        match self {
            ArrFlavor::Sonarr => "series",
            ArrFlavor::Radarr => "movie",
        }
    }

    fn kind(&self) -> MediaKind {
        match self {
            ArrFlavor::Sonarr => MediaKind::Series,
            ArrFlavor::Radarr => MediaKind::Movie,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ArrFlavor::Sonarr => "sonarr",
            ArrFlavor::Radarr => "radarr",
        }
    }
}

#[derive(Clone)]
pub struct ArrProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    flavor: ArrFlavor,
}

impl ArrProvider {
    pub fn new(http_client: HttpClient, credentials: ServiceCredentials, flavor: ArrFlavor) -> Self {
        Self {
            http_client,
            api_key: credentials.secret,
            api_url: credentials.base_url,
            flavor,
        }
    }

    pub fn sonarr(http_client: HttpClient, credentials: ServiceCredentials) -> Self {
        Self::new(http_client, credentials, ArrFlavor::Sonarr)
    }

    pub fn radarr(http_client: HttpClient, credentials: ServiceCredentials) -> Self {
        Self::new(http_client, credentials, ArrFlavor::Radarr)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}/api/v3/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "{} API returned status {}: {}",
                self.flavor.name(),
                status,
                body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl TitleLookup for ArrProvider {
    async fn lookup_title(&self, title: &str) -> AppResult<Option<MediaItem>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Lookup term cannot be empty".to_string(),
            ));
        }

        let path = format!("{}/lookup", self.flavor.resource());
        let results: Vec<MediaItem> = self.get_json(&path, &[("term", title)]).await?;

        tracing::info!(
            term = %title,
            results = results.len(),
            provider = self.flavor.name(),
            "Title lookup completed"
        );

        Ok(results.into_iter().next())
    }
}

#[async_trait::async_trait]
impl LibrarySource for ArrProvider {
    async fn library_titles(&self, kind: MediaKind) -> AppResult<Vec<String>> {
        if kind != self.flavor.kind() {
            return Err(AppError::InvalidInput(format!(
                "{} does not manage {} titles",
                self.flavor.name(),
                kind
            )));
        }

        let items: Vec<ArrLibraryItem> = self.get_json(self.flavor.resource(), &[]).await?;
        let titles: Vec<String> = items.into_iter().map(|item| item.title).collect();

        tracing::info!(
            titles = titles.len(),
            provider = self.flavor.name(),
            "Library fetched"
        );

        Ok(titles)
    }

    async fn test_connection(&self) -> AppResult<()> {
        let status: ArrSystemStatus = self.get_json("system/status", &[]).await?;

        tracing::info!(
            provider = self.flavor.name(),
            app_name = status.app_name.as_deref().unwrap_or("unknown"),
            version = status.version.as_deref().unwrap_or("unknown"),
            "Connection test succeeded"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        self.flavor.name()
    }
}
