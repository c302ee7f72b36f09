use regex::Regex;
use std::sync::OnceLock;

use crate::models::RecommendationEntry;
use crate::parser::fields::extract_field;

pub const DESCRIPTION_LABEL: &str = "Description";
pub const REASONING_LABEL: &str = "Why you might like it";
pub const STREAMING_LABEL: &str = "Available on";

const DEFAULT_MAX_TITLE_CHARS: usize = 50;
const DEFAULT_STREAMING: &str = "Unknown";
const PREAMBLE_MARKER: &str = "here are";
const PREAMBLE_SUBJECTS: &[&str] = &["recommendation", "tv show", "movie"];
const TITLE_FRAGMENTS: &[&str] = &["here are", "recommendation", "available on"];
const SECTION_HEADERS: &[&str] = &["why you might like it", "description"];

/// Matches numbered-list markers such as "1. " or "12. "
fn numbered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\. +").expect("Invalid regex"))
}

/// Heuristics used to tell real entries from preamble and mis-split headers
///
/// Tuned against the formatting template sent with every prompt; all phrases are
/// compared against lowercased text.
#[derive(Debug, Clone)]
pub struct ParseRules {
    pub max_title_chars: usize,
    /// A segment containing this phrase plus any subject is introductory text
    pub preamble_marker: String,
    pub preamble_subjects: Vec<String>,
    /// A title containing any of these is a mis-split sentence, not a title
    pub title_fragments: Vec<String>,
    /// A title equal to any of these is a section header
    pub section_headers: Vec<String>,
    pub default_streaming: String,
}

impl Default for ParseRules {
    fn default() -> Self {
        let owned = |phrases: &[&str]| phrases.iter().map(|p| p.to_string()).collect();

        Self {
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            preamble_marker: PREAMBLE_MARKER.to_string(),
            preamble_subjects: owned(PREAMBLE_SUBJECTS),
            title_fragments: owned(TITLE_FRAGMENTS),
            section_headers: owned(SECTION_HEADERS),
            default_streaming: DEFAULT_STREAMING.to_string(),
        }
    }
}

impl ParseRules {
    fn is_preamble(&self, lowered_segment: &str) -> bool {
        lowered_segment.contains(&self.preamble_marker)
            && self
                .preamble_subjects
                .iter()
                .any(|subject| lowered_segment.contains(subject.as_str()))
    }

    fn is_disqualified_title(&self, title: &str) -> bool {
        let lowered = title.to_lowercase();

        title.is_empty()
            || title.chars().count() > self.max_title_chars
            || self
                .title_fragments
                .iter()
                .any(|fragment| lowered.contains(fragment.as_str()))
            || self.section_headers.iter().any(|header| lowered == *header)
    }
}

/// Turns a numbered LLM reply into recommendation entries
#[derive(Debug, Clone, Default)]
pub struct RecommendationParser {
    rules: ParseRules,
}

impl RecommendationParser {
    pub fn new(rules: ParseRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ParseRules {
        &self.rules
    }

    /// Parses a raw completion into entries, preserving reply order
    ///
    /// An unnumbered reply is parsed as a single segment. When that yields nothing, a
    /// non-blank reply becomes one entry holding the whole text in `full_text` with
    /// every structured field empty.
    pub fn parse(&self, raw: &str) -> Vec<RecommendationEntry> {
        let segments: Vec<&str> = numbered_marker()
            .split(raw)
            .filter(|segment| !segment.trim().is_empty())
            .collect();

        if segments.is_empty() {
            return Vec::new();
        }

        if segments.len() == 1 && !numbered_marker().is_match(raw) {
            let trimmed = raw.trim();
            if let Some(entry) = self.parse_segment(trimmed) {
                return vec![entry];
            }

            tracing::debug!(
                length = trimmed.len(),
                "Reply has no numbered entries, keeping it as a single entry"
            );
            return vec![RecommendationEntry {
                full_text: trimmed.to_string(),
                ..RecommendationEntry::default()
            }];
        }

        let entries: Vec<RecommendationEntry> = segments
            .into_iter()
            .filter_map(|segment| self.parse_segment(segment))
            .collect();

        tracing::debug!(entries = entries.len(), "Parsed recommendation reply");

        entries
    }

    fn parse_segment(&self, segment: &str) -> Option<RecommendationEntry> {
        if self.rules.is_preamble(&segment.to_lowercase()) {
            tracing::debug!("Skipping introductory segment");
            return None;
        }

        let (raw_title, details) = split_title(segment);
        let title = raw_title.replace("**", "").trim().to_string();

        if self.rules.is_disqualified_title(&title) {
            tracing::debug!(title = %title, "Skipping segment with header-like title");
            return None;
        }

        let description = extract_field(details, DESCRIPTION_LABEL, Some(REASONING_LABEL));
        let reasoning = extract_field(details, REASONING_LABEL, Some(STREAMING_LABEL));
        let streaming = extract_field(details, STREAMING_LABEL, None);

        if description.is_none() && reasoning.is_none() && streaming.is_none() {
            tracing::debug!(title = %title, "Skipping segment without labeled fields");
            return None;
        }

        Some(RecommendationEntry {
            title,
            description: description.unwrap_or_default(),
            reasoning: reasoning.unwrap_or_default(),
            streaming: streaming.unwrap_or_else(|| self.rules.default_streaming.clone()),
            full_text: segment.trim().to_string(),
        })
    }
}

/// Title is everything before the first colon, else before the first newline
fn split_title(segment: &str) -> (&str, &str) {
    segment
        .split_once(':')
        .or_else(|| segment.split_once('\n'))
        .unwrap_or((segment, ""))
}

/// Parses with the default rules
pub fn parse_recommendations(raw: &str) -> Vec<RecommendationEntry> {
    RecommendationParser::default().parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SHOWS: &str = "1. Severance: \nDescription: A thriller about work-life balance.\nWhy you might like it: You liked Lost.\nAvailable on: Apple TV+\n\n2. The Bear:\nDescription: A chef drama.\nWhy you might like it: You liked cooking shows.\nAvailable on: Hulu";

    #[test]
    fn test_parses_two_entries() {
        let entries = parse_recommendations(TWO_SHOWS);

        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "Severance");
        assert_eq!(entries[0].description, "A thriller about work-life balance.");
        assert_eq!(entries[0].reasoning, "You liked Lost.");
        assert_eq!(entries[0].streaming, "Apple TV+");

        assert_eq!(entries[1].title, "The Bear");
        assert_eq!(entries[1].description, "A chef drama.");
        assert_eq!(entries[1].reasoning, "You liked cooking shows.");
        assert_eq!(entries[1].streaming, "Hulu");
        assert!(entries[1].full_text.starts_with("The Bear:"));
        assert!(entries[1].full_text.ends_with("Available on: Hulu"));
    }

    #[test]
    fn test_preamble_is_not_an_entry() {
        let raw = "Here are 3 recommendations based on your library:\n\n1. Show X:\nDescription: Something odd.\nWhy you might like it: It is odd.\nAvailable on: Netflix";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Show X");
    }

    #[test]
    fn test_unnumbered_reply_becomes_single_entry() {
        let raw = "  I could not find anything that matches your library, sorry.  \n";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].full_text,
            "I could not find anything that matches your library, sorry."
        );
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].description, "");
        assert_eq!(entries[0].reasoning, "");
        assert_eq!(entries[0].streaming, "");
    }

    #[test]
    fn test_unnumbered_labeled_reply_is_parsed() {
        let raw = "Severance:\nDescription: A thriller about work.\nWhy you might like it: You liked Lost.\nAvailable on: Apple TV+\n";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Severance");
        assert_eq!(entries[0].description, "A thriller about work.");
        assert_eq!(entries[0].reasoning, "You liked Lost.");
        assert_eq!(entries[0].streaming, "Apple TV+");
        assert_eq!(entries[0].full_text, raw.trim());
    }

    #[test]
    fn test_unnumbered_preamble_falls_back_to_single_entry() {
        let raw = "Here are some movie ideas:\nDescription: none really.";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].full_text, raw);
    }

    #[test]
    fn test_fields_are_read_after_the_title_split() {
        // The first colon ends the title, so the label is swallowed into it
        let entries = parse_recommendations("1. Twin Peaks\nDescription: surreal");

        assert!(entries.is_empty());
    }

    #[test]
    fn test_blank_reply_has_no_entries() {
        assert!(parse_recommendations("").is_empty());
        assert!(parse_recommendations(" \n\t ").is_empty());
    }

    #[test]
    fn test_bold_markers_stripped_from_title() {
        let raw = "1. **Dark**:\nDescription: Time travel in a small town.\nAvailable on: Netflix";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Dark");
        assert_eq!(entries[0].reasoning, "");
    }

    #[test]
    fn test_missing_streaming_defaults_to_unknown() {
        let raw = "1. Fargo:\nDescription: Crime anthology.\nWhy you might like it: Dark humor.";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].streaming, "Unknown");
        assert_eq!(entries[0].reasoning, "Dark humor.");
    }

    #[test]
    fn test_segment_without_fields_is_dropped() {
        let raw = "1. Fargo: a great show\n2. Dark:\nDescription: Time travel.";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Dark");
    }

    #[test]
    fn test_header_titles_are_dropped() {
        let raw = "1. Description: A list of picks\n2. Why you might like it: Reasons here\n3. Andor:\nDescription: Rebels.\nAvailable on: Disney+";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Andor");
    }

    #[test]
    fn test_overlong_title_is_dropped() {
        let long_title = "A".repeat(51);
        let raw = format!(
            "1. {}:\nDescription: Too long.\n2. {}:\nDescription: Just right.",
            long_title,
            "B".repeat(50)
        );

        let entries = parse_recommendations(&raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "B".repeat(50));
    }

    #[test]
    fn test_title_split_on_newline_without_colon() {
        let raw = "1. Twin Peaks\nDescription - surreal mystery\n";

        let entries = parse_recommendations(raw);

        // No colon anywhere: the title ends at the newline and the label is still found
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Twin Peaks");
        assert_eq!(entries[0].description, "- surreal mystery");
    }

    #[test]
    fn test_custom_rules_relax_title_length() {
        let parser = RecommendationParser::new(ParseRules {
            max_title_chars: 80,
            ..ParseRules::default()
        });
        let raw = format!("1. {}:\nDescription: Long titled film.", "C".repeat(60));

        let entries = parser.parse(&raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(parser.rules().max_title_chars, 80);
    }

    #[test]
    fn test_available_on_title_is_dropped() {
        let raw = "1. Available on: Netflix, Hulu\n2. Shogun:\nDescription: Feudal Japan.";

        let entries = parse_recommendations(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Shogun");
    }
}
