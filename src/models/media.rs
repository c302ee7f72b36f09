use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Which library a title belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Series,
    Movie,
}

impl MediaKind {
    /// Noun used when talking to the LLM
    pub fn prompt_noun(&self) -> &'static str {
        match self {
            MediaKind::Series => "TV shows",
            MediaKind::Movie => "movies",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Series => write!(f, "series"),
            MediaKind::Movie => write!(f, "movie"),
        }
    }
}

/// One image attached to a looked-up media item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaImage {
    pub cover_type: String,
    #[serde(default)]
    pub remote_url: Option<String>,
}

/// Result shape of a title lookup against Sonarr or Radarr
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MediaItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Vec<MediaImage>,
}

impl MediaItem {
    /// Remote URL of the first poster-tagged image, if any
    pub fn poster_url(&self) -> Option<&str> {
        self.images
            .iter()
            .filter(|image| image.cover_type == "poster")
            .find_map(|image| image.remote_url.as_deref().filter(|url| !url.is_empty()))
    }
}

/// Resolved artwork for a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResult {
    /// Poster URL reported by the media manager
    Remote(String),
    /// Generated `data:` URL standing in for a missing poster
    Placeholder(String),
}

impl ImageResult {
    pub fn url(&self) -> &str {
        match self {
            ImageResult::Remote(url) | ImageResult::Placeholder(url) => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageResult::Placeholder(_))
    }
}

/// Background hue and initials for a placeholder poster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpec {
    pub hue: u16,
    pub initials: String,
}
