/// Stable cache-key form of a title: trailing `:` `.` `!` `?` and surrounding whitespace removed
///
/// "Show!" and "Show" map to the same key. Trailing punctuation and whitespace are
/// stripped together so the result is a fixed point of `normalize`.
pub fn normalize(title: &str) -> String {
    title
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '.' | '!' | '?'))
        .trim_start()
        .to_string()
}

/// The part of a title before its first colon, e.g. "Star Wars" for "Star Wars: Andor"
pub fn simplify(title: &str) -> Option<String> {
    let (head, _) = title.split_once(':')?;
    let head = head.trim();
    (!head.is_empty()).then(|| head.to_string())
}

/// Replaces everything except letters, digits and whitespace with spaces, then collapses whitespace
///
/// Callers compare the result with the input; an unchanged title is not worth a second lookup.
pub fn alphanumeric_only(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
