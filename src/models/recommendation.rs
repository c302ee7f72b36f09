use serde::{Deserialize, Serialize};

use super::MediaKind;

/// One parsed recommendation from an LLM reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
    pub title: String,
    pub description: String,
    pub reasoning: String,
    pub streaming: String,
    /// Trimmed source text the entry was parsed from
    pub full_text: String,
}

/// Caller input for a recommendation run
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub kind: MediaKind,
    /// Titles already in the user's library; fetched from the configured source when absent
    #[serde(default)]
    pub library_titles: Option<Vec<String>>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Titles the LLM must not suggest again
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A single chat message sent to the completion API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
