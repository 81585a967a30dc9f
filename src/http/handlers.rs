//! HTTP request handlers
//!
//! One method-agnostic handler serves both modes of the proxy:
//! - `?segment=<absolute url>` streams a media segment through
//! - `?url=<page>` discovers the page's HLS master playlist

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use url::Url;

use crate::config::{PlaylistMode, ServerConfig};
use crate::error::{ProxyError, Result};
use crate::playlist::rewrite_segments;
use crate::resolver::normalize_target;
use crate::state::AppState;

const HLS_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
const SEGMENT_CONTENT_TYPE: &str = "video/mp2t";

/// Query parameters of the proxy endpoint.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProxyParams {
    /// Page link to resolve.
    pub url: Option<String>,
    /// Absolute segment URL. Takes precedence over `url`.
    pub segment: Option<String>,
}

impl ProxyParams {
    /// Parse a raw query string. Repeated keys keep their first value.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "url" => &mut params.url,
                "segment" => &mut params.segment,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("disk-hls-proxy v", env!("CARGO_PKG_VERSION"))
}

/// Proxy endpoint
/// ANY /?url=<page> | /?segment=<segment url>
pub async fn handle_request(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let params = ProxyParams::from_query(query.as_deref());
    if let Some(segment) = params.segment.as_deref() {
        return proxy_segment(&state, segment).await;
    }

    let target = params
        .url
        .as_deref()
        .and_then(normalize_target)
        .ok_or(ProxyError::MissingUrl)?;
    tracing::info!("Resolving playlist for {}", target);

    let discovery = state.resolver.discover(&target).await;
    let Some(playlist) = discovery.playlist else {
        tracing::info!("No playlist found for {}, tested {:?}", target, discovery.tested);
        return Err(ProxyError::PlaylistNotFound {
            tested: discovery.tested,
        });
    };

    match state.config.resolver.mode {
        PlaylistMode::Redirect => redirect_to(&playlist),
        PlaylistMode::Rewrite => {
            let request_base = request_base_url(&state.config, &headers, &uri)?;
            serve_rewritten_playlist(&state, &playlist, &request_base).await
        }
    }
}

/// Stream a segment from upstream without looking at it.
async fn proxy_segment(state: &AppState, segment: &str) -> Result<Response> {
    tracing::debug!("Proxying segment {}", segment);

    let upstream = state.http_client.get(segment).send().await.map_err(|e| {
        tracing::error!("Segment fetch failed for {}: {}", segment, e);
        ProxyError::Upstream(e)
    })?;

    Response::builder()
        .status(upstream.status())
        .header(header::CONTENT_TYPE, SEGMENT_CONTENT_TYPE)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ProxyError::Internal(e.to_string()))
}

fn redirect_to(playlist: &str) -> Result<Response> {
    let location = HeaderValue::from_str(playlist)
        .map_err(|e| ProxyError::Internal(format!("invalid playlist location: {}", e)))?;
    let mut response = StatusCode::FOUND.into_response();
    response.headers_mut().insert(header::LOCATION, location);
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    Ok(response)
}

/// Fetch the playlist and point its segments back at this proxy.
async fn serve_rewritten_playlist(
    state: &AppState,
    playlist_url: &str,
    request_base: &str,
) -> Result<Response> {
    let upstream = state.http_client.get(playlist_url).send().await?;
    if !upstream.status().is_success() {
        return Err(ProxyError::UpstreamStatus {
            status: upstream.status().as_u16(),
            url: playlist_url.to_string(),
        });
    }
    let body = upstream.text().await?;
    let rewritten = rewrite_segments(&body, playlist_url, request_base);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HLS_CONTENT_TYPE));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    Ok((headers, rewritten).into_response())
}

/// Scheme, host and path of the incoming request, without query.
///
/// `public_base_url` wins when configured; otherwise the Host and
/// X-Forwarded-Proto headers are used.
pub fn request_base_url(config: &ServerConfig, headers: &HeaderMap, uri: &Uri) -> Result<String> {
    let raw = match &config.resolver.public_base_url {
        Some(base) => format!("{}{}", base.trim_end_matches('/'), uri.path()),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .or_else(|| uri.authority().map(|a| a.to_string()))
                .unwrap_or_else(|| config.socket_addr());
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .or_else(|| uri.scheme_str().map(str::to_string))
                .unwrap_or_else(|| "http".to_string());
            format!("{}://{}{}", scheme, host, uri.path())
        }
    };

    let mut url = Url::parse(&raw)?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.into())
}
