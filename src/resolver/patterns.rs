//! Text patterns used while scanning pages and scripts.
//!
//! Scanning is plain regex matching over the raw response text; no DOM is
//! built. The playlist pattern depends on the configured streaming host, the
//! HTML patterns are fixed.

use regex::Regex;
use std::borrow::Cow;

// helper.
macro_rules! static_regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}
pub(crate) use static_regex;

/// Matcher for HLS master playlist URLs on a streaming host.
#[derive(Debug, Clone)]
pub struct PlaylistPattern {
    re: Regex,
}

impl PlaylistPattern {
    /// Build the matcher for `host`, e.g. `streaming.disk.yandex.net`.
    ///
    /// Matches `http(s)://<host>/hls/...master-playlist.m3u8`, case
    /// insensitive, without whitespace, quotes or angle brackets in between.
    pub fn new(host: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!(
            r#"(?i)https?://{}/hls/[^\s"'<>]*?master-playlist\.m3u8"#,
            regex::escape(host)
        ))?;
        Ok(Self { re })
    }

    /// First playlist URL in `text`, with HTML entities decoded.
    pub fn find(&self, text: &str) -> Option<String> {
        self.re
            .find(text)
            .map(|m| decode_html_entities(m.as_str()).into_owned())
    }
}

/// `src` attribute values of all `<script>` tags, in document order.
pub fn script_sources(html: &str) -> Vec<&str> {
    static_regex!(r#"(?i)<script[^>]+src=["']([^"']+)["'][^>]*>"#)
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Contents of all `<script>...</script>` blocks, in document order.
pub fn inline_scripts(html: &str) -> Vec<&str> {
    static_regex!(r"(?is)<script\b[^>]*>(.*?)</script>")
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Decode the handful of entities that show up in attribute values.
///
/// Entities are replaced one after another, `&amp;` first, so an escaped
/// entity such as `&amp;lt;` ends up fully decoded.
pub fn decode_html_entities(s: &str) -> Cow<'_, str> {
    const ENTITIES: [(&str, &str); 5] = [
        ("&amp;", "&"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&lt;", "<"),
        ("&gt;", ">"),
    ];
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        ENTITIES
            .iter()
            .fold(s.to_string(), |acc, (entity, ch)| acc.replace(entity, ch)),
    )
}
