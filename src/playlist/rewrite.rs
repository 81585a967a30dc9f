//! Segment URL rewriting
//!
//! Every `<name>.ts` token in a fetched playlist is replaced by a link back to
//! this proxy carrying the absolute segment URL in the `segment` query
//! parameter. The absolute URL is the playlist's directory plus the token.

use crate::resolver::patterns::static_regex;

/// Playlist URL up to and including the last `/`.
pub fn playlist_base(playlist_url: &str) -> &str {
    match playlist_url.rfind('/') {
        Some(pos) => &playlist_url[..=pos],
        None => "",
    }
}

/// Proxy link for an absolute segment URL.
pub fn segment_proxy_url(request_base: &str, segment_url: &str) -> String {
    format!(
        "{}?segment={}",
        request_base,
        urlencoding::encode(segment_url)
    )
}

/// Rewrite all segment tokens of `playlist` to proxy links.
pub fn rewrite_segments(playlist: &str, playlist_url: &str, request_base: &str) -> String {
    let base = playlist_base(playlist_url);
    static_regex!(r"[A-Za-z0-9_-]+\.ts\b")
        .replace_all(playlist, |caps: &regex::Captures| {
            segment_proxy_url(request_base, &format!("{}{}", base, &caps[0]))
        })
        .into_owned()
}
