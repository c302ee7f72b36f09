/// Plex Media Server adapter
///
/// Library listing only. Plex answers XML by default, so every request asks for JSON
/// and authenticates with the `X-Plex-Token` header.
use crate::{
    config::ServiceCredentials,
    error::{AppError, AppResult},
    models::{MediaKind, PlexEnvelope, PlexSectionItems, PlexSections},
    services::providers::LibrarySource,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const TOKEN_HEADER: &str = "X-Plex-Token";

#[derive(Clone)]
pub struct PlexProvider {
    http_client: HttpClient,
    token: String,
    api_url: String,
}

/// Plex section type holding titles of the given kind
fn section_type(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Series => "show",
        MediaKind::Movie => "movie",
    }
}

impl PlexProvider {
    pub fn new(http_client: HttpClient, credentials: ServiceCredentials) -> Self {
        Self {
            http_client,
            token: credentials.secret,
            api_url: credentials.base_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Plex API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl LibrarySource for PlexProvider {
    async fn library_titles(&self, kind: MediaKind) -> AppResult<Vec<String>> {
        let sections: PlexEnvelope<PlexSections> = self.get_json("/library/sections").await?;

        let wanted = section_type(kind);
        let mut titles = Vec::new();

        for section in sections
            .media_container
            .directories
            .iter()
            .filter(|section| section.section_type == wanted)
        {
            let items: PlexEnvelope<PlexSectionItems> = self
                .get_json(&format!("/library/sections/{}/all", section.key))
                .await?;

            tracing::debug!(
                section = section.title.as_deref().unwrap_or(&section.key),
                items = items.media_container.metadata.len(),
                "Plex section fetched"
            );

            titles.extend(items.media_container.metadata.into_iter().map(|m| m.title));
        }

        tracing::info!(
            kind = %kind,
            titles = titles.len(),
            provider = "plex",
            "Library fetched"
        );

        Ok(titles)
    }

    async fn test_connection(&self) -> AppResult<()> {
        let _: serde_json::Value = self.get_json("/identity").await?;
        tracing::info!(provider = "plex", "Connection test succeeded");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "plex"
    }
}
