use serde::{Deserialize, Serialize};

mod media;
mod recommendation;

pub use media::{ImageResult, MediaImage, MediaItem, MediaKind, PlaceholderSpec};
pub use recommendation::{ChatMessage, RecommendationEntry, RecommendationRequest};

// ============================================================================
// Sonarr / Radarr API Types
// ============================================================================

/// Library entry from GET /api/v3/series or GET /api/v3/movie
#[derive(Debug, Clone, Deserialize)]
pub struct ArrLibraryItem {
    pub title: String,
}

/// Response from GET /api/v3/system/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrSystemStatus {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

// ============================================================================
// Plex API Types
// ============================================================================

/// Plex wraps every JSON payload in a `MediaContainer` object
#[derive(Debug, Clone, Deserialize)]
pub struct PlexEnvelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexSections {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<PlexDirectory>,
}

/// A library section, e.g. `{ "key": "2", "type": "show", "title": "TV Shows" }`
#[derive(Debug, Clone, Deserialize)]
pub struct PlexDirectory {
    pub key: String,
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexSectionItems {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexMetadata {
    pub title: String,
}

// ============================================================================
// OpenAI-compatible API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
