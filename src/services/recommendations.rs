use crate::{
    error::{AppError, AppResult},
    models::{ChatMessage, MediaKind, RecommendationEntry, RecommendationRequest},
    parser::RecommendationParser,
    services::llm::CompletionClient,
};

pub const MAX_RECOMMENDATIONS: usize = 20;

/// Formatting contract with the LLM; the parser depends on these exact labels
pub const RESPONSE_TEMPLATE: &str = "1. [Title]:\nDescription: [text]\nWhy you might like it: [text]\nAvailable on: [text]";

/// Builds the system + user messages for a recommendation run
pub fn build_prompt(request: &RecommendationRequest, titles: &[String], count: usize) -> Vec<ChatMessage> {
    let noun = request.kind.prompt_noun();

    let system = format!(
        "You are a {} recommendation assistant. Recommend titles the user does not already own, \
         and always answer using the exact numbered format you are given.",
        match request.kind {
            MediaKind::Series => "TV show",
            MediaKind::Movie => "movie",
        }
    );

    let mut user = format!(
        "Based on the following {} in my library, recommend {} {} I might enjoy.\n\nMy library:\n{}\n",
        noun,
        count,
        noun,
        titles.join(", ")
    );

    if let Some(genre) = request.genre.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        user.push_str(&format!("\nOnly recommend titles in the {} genre.\n", genre));
    }

    if !request.exclude.is_empty() {
        user.push_str(&format!(
            "\nDo not recommend any of these: {}\n",
            request.exclude.join(", ")
        ));
    }

    user.push_str(&format!(
        "\nFormat each recommendation exactly like this:\n{}\n",
        RESPONSE_TEMPLATE
    ));

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Generates recommendations for a library via the completion API
///
/// The count defaults to `default_count` and is clamped to `1..=MAX_RECOMMENDATIONS`.
pub async fn get_recommendations(
    client: &dyn CompletionClient,
    parser: &RecommendationParser,
    request: &RecommendationRequest,
    titles: &[String],
    default_count: usize,
) -> AppResult<Vec<RecommendationEntry>> {
    let titles: Vec<String> = titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if titles.is_empty() {
        return Err(AppError::InvalidInput(
            "Library must contain at least one title".to_string(),
        ));
    }

    let count = request
        .count
        .unwrap_or(default_count)
        .clamp(1, MAX_RECOMMENDATIONS);

    tracing::info!(
        kind = %request.kind,
        library_size = titles.len(),
        count = count,
        "Requesting recommendations"
    );

    let messages = build_prompt(request, &titles, count);
    let reply = client.complete(&messages).await?;
    let entries = parser.parse(&reply);

    tracing::info!(
        kind = %request.kind,
        entries = entries.len(),
        "Recommendations parsed"
    );

    Ok(entries)
}
