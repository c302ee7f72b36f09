use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::{
    cache::{Cache, CacheKey},
    models::PlaceholderSpec,
    parser::normalize,
};

pub const PLACEHOLDER_WIDTH: u32 = 300;
pub const PLACEHOLDER_HEIGHT: u32 = 450;
const SATURATION: u8 = 70;
const LIGHTNESS: u8 = 40;

/// 32-bit rolling hash (`h * 31 + unit`, wrapping) over UTF-16 code units, made absolute
pub fn title_hash(title: &str) -> u32 {
    title
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// First letters of the first two words, uppercased
pub fn initials(title: &str) -> String {
    title
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .filter_map(|c| c.to_uppercase().next())
        .collect()
}

/// Color and initials for a title; a pure function of the normalized title
pub fn placeholder_spec(title: &str) -> PlaceholderSpec {
    let normalized = normalize(title);

    PlaceholderSpec {
        hue: (title_hash(&normalized) % 360) as u16,
        initials: initials(&normalized),
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_svg(spec: &PlaceholderSpec) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<rect width="{w}" height="{h}" fill="hsl({hue}, {s}%, {l}%)"/>"#,
            r##"<text x="50%" y="50%" font-family="Arial, Helvetica, sans-serif" font-size="120" font-weight="bold" fill="#ffffff" text-anchor="middle" dominant-baseline="middle">{initials}</text>"##,
            "</svg>"
        ),
        w = PLACEHOLDER_WIDTH,
        h = PLACEHOLDER_HEIGHT,
        hue = spec.hue,
        s = SATURATION,
        l = LIGHTNESS,
        initials = escape_xml(&spec.initials),
    )
}

pub fn render_data_url(spec: &PlaceholderSpec) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        BASE64.encode(render_svg(spec))
    )
}

/// Placeholder posters, memoized by normalized title
///
/// Kept in its own cache so it never answers a poster lookup.
#[derive(Clone, Default)]
pub struct PlaceholderGenerator {
    cache: Cache,
}

impl PlaceholderGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fallback_for(&self, title: &str) -> String {
        let key = CacheKey::placeholder(title);

        if let Some(hit) = self.cache.get_from_cache(&key).await {
            return hit;
        }

        let spec = placeholder_spec(title);
        let data_url = render_data_url(&spec);

        tracing::debug!(
            title = %key,
            hue = spec.hue,
            initials = %spec.initials,
            "Generated placeholder poster"
        );

        self.cache.set_in_cache(&key, data_url.clone()).await;
        data_url
    }

    pub async fn cached_count(&self) -> usize {
        self.cache.len().await
    }
}
