/// OpenAI-compatible chat completion client
///
/// Works against any endpoint speaking the `/chat/completions` dialect (OpenAI, or a
/// local server exposing the same API). The API key is sent as a bearer token.
use crate::{
    config::{Config, ServiceCredentials},
    error::{AppError, AppResult},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
};
use reqwest::Client as HttpClient;

/// Sends prompts to an LLM and returns the raw reply text
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String>;

    async fn test_connection(&self) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&Config> for CompletionSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.openai_model.clone(),
            max_tokens: config.openai_max_tokens,
            temperature: config.openai_temperature,
        }
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    settings: CompletionSettings,
}

impl OpenAiClient {
    pub fn new(
        http_client: HttpClient,
        credentials: ServiceCredentials,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            http_client,
            api_key: credentials.secret,
            api_url: credentials.base_url,
            settings,
        }
    }

    async fn error_for_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::ExternalApi(format!(
            "Completion API returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);

        let request = ChatCompletionRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let completion: ChatCompletionResponse =
            Self::error_for_status(response).await?.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::ExternalApi("Completion response has no message content".to_string())
            })?;

        tracing::info!(
            model = %self.settings.model,
            reply_chars = content.len(),
            "Completion received"
        );

        Ok(content)
    }

    async fn test_connection(&self) -> AppResult<()> {
        let url = format!("{}/models", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::error_for_status(response).await?;
        tracing::info!(provider = "llm", "Connection test succeeded");
        Ok(())
    }
}
