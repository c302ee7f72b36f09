//! Recommendation and artwork backend for a media library
//!
//! Asks an OpenAI-compatible LLM for TV show or movie suggestions based on what is
//! already in Sonarr, Radarr or Plex, parses the free-text reply into structured
//! entries, and resolves poster artwork with a generated placeholder as fallback.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod parser;
pub mod services;

pub use error::{AppError, AppResult};
