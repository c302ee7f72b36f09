/// Extracts the value of a labeled field from free text
///
/// The start label is matched case-insensitively. The cursor then skips the label,
/// one optional colon, and any whitespace. The value runs until `end_label` (matched
/// case-insensitively from the cursor onwards) or to the end of the text.
///
/// Returns `None` when the label is absent or the trimmed value is shorter than two
/// characters or made only of punctuation and whitespace.
pub fn extract_field(text: &str, start_label: &str, end_label: Option<&str>) -> Option<String> {
    let label_start = find_ignore_ascii_case(text, start_label, 0)?;

    let mut cursor = label_start + start_label.len();
    if text[cursor..].starts_with(':') {
        cursor += 1;
    }
    let rest = &text[cursor..];
    cursor += rest.len() - rest.trim_start().len();

    let end = end_label
        .and_then(|label| find_ignore_ascii_case(text, label, cursor))
        .unwrap_or(text.len());

    let value = text[cursor..end].trim();

    if value.chars().count() < 2 || is_only_punctuation(value) {
        return None;
    }

    Some(value.to_string())
}

fn is_only_punctuation(value: &str) -> bool {
    value
        .chars()
        .all(|c| matches!(c, '.' | ',' | ';' | ':') || c.is_whitespace())
}

/// Byte offset of the first case-insensitive match of `needle` at or after `from`.
///
/// Labels are ASCII, so a match always starts and ends on a char boundary.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || from > haystack.len() {
        return None;
    }

    haystack.as_bytes()[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|offset| from + offset)
}
