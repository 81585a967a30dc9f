//! Server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default public resource download API endpoint
pub const DEFAULT_DISK_API_URL: &str =
    "https://cloud-api.yandex.net/v1/disk/public/resources/download";

/// How a discovered playlist is handed back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistMode {
    /// 302 straight to the discovered playlist
    Redirect,
    /// Fetch the playlist and route its segments back through the proxy
    #[default]
    Rewrite,
}

/// Playlist discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Response variant for a discovered playlist
    pub mode: PlaylistMode,

    /// Host serving the HLS master playlists
    pub playlist_host: String,

    /// Public resource download API endpoint
    pub disk_api_url: String,

    /// Regional host used when building the share public key
    pub share_host: String,

    /// Hosts rewritten to `share_host` before the API lookup
    pub share_host_aliases: Vec<String>,

    /// Externally visible base URL of this proxy. Derived from the
    /// request's Host header when unset.
    pub public_base_url: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mode: PlaylistMode::default(),
            playlist_host: "streaming.disk.yandex.net".to_string(),
            disk_api_url: DEFAULT_DISK_API_URL.to_string(),
            share_host: "disk.yandex.ru".to_string(),
            share_host_aliases: vec!["disk.yandex.com".to_string()],
            public_base_url: None,
        }
    }
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// User-Agent sent to upstream origins
    pub user_agent: String,

    /// Per-request timeout in seconds. None leaves it to the transport.
    pub timeout_secs: Option<u64>,

    /// Maximum redirects followed per fetch
    pub max_redirects: usize,

    /// Honour HTTP(S)_PROXY from the environment
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("disk-hls-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            max_redirects: 10,
            system_proxy: true,
        }
    }
}

impl UpstreamConfig {
    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,

    /// Discovery configuration
    pub resolver: ResolverConfig,

    /// Outbound client configuration
    pub upstream: UpstreamConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            resolver: ResolverConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
