//! Test fixtures for integration tests
//!
//! A `wiremock` server plays every upstream at once: share pages, scripts,
//! the download API, the streaming host and the segments.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::MockServer;

use crate::config::{PlaylistMode, ResolverConfig, ServerConfig, UpstreamConfig};
use crate::http::create_router;
use crate::state::AppState;

/// Public base URL the proxy advertises in rewritten playlists.
pub const PROXY_BASE: &str = "https://proxy.test";

/// Path of the download API on the mock server.
pub const DISK_API_PATH: &str = "/v1/disk/public/resources/download";

/// Configuration pointing every upstream at `server`.
pub fn test_config(server: &MockServer, mode: PlaylistMode) -> ServerConfig {
    ServerConfig {
        resolver: ResolverConfig {
            mode,
            playlist_host: server.address().to_string(),
            disk_api_url: format!("{}{}", server.uri(), DISK_API_PATH),
            public_base_url: Some(PROXY_BASE.to_string()),
            ..Default::default()
        },
        upstream: UpstreamConfig {
            system_proxy: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn test_app(server: &MockServer, mode: PlaylistMode) -> Router {
    let state = AppState::new(test_config(server, mode)).expect("test state");
    create_router(Arc::new(state))
}

/// Absolute playlist URL on the mock streaming host.
pub fn playlist_url(server: &MockServer) -> String {
    format!("{}/hls/xyz/master-playlist.m3u8", server.uri())
}

/// Query string value, percent-encoded.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Response parts collected for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

/// Send a GET through the router.
pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .header("host", "proxy.test")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

/// HTML page embedding `url` in a video tag, entity-escaped like real pages.
pub fn page_with_playlist(url: &str) -> String {
    format!(
        "<html><body><video data-src=\"{}\"></video></body></html>",
        url.replace('&', "&amp;")
    )
}

/// Playlist body with the given segment names.
pub fn playlist_body(segments: &[&str]) -> String {
    let mut body = String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n");
    for segment in segments {
        body.push_str("#EXTINF:10.0,\n");
        body.push_str(segment);
        body.push('\n');
    }
    body.push_str("#EXT-X-ENDLIST\n");
    body
}
