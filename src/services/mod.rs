pub mod llm;
pub mod placeholder;
pub mod posters;
pub mod providers;
pub mod recommendations;

pub use llm::{CompletionClient, OpenAiClient};
pub use placeholder::PlaceholderGenerator;
pub use posters::PosterCache;
