//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section except
//! `[server]` is optional and falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{PlaylistMode, ResolverConfig, ServerConfig, UpstreamConfig};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Discovery settings
    pub resolver: Option<ResolverSettings>,
    /// Outbound client settings
    pub upstream: Option<UpstreamSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// redirect or rewrite
    pub mode: Option<PlaylistMode>,
    pub playlist_host: Option<String>,
    pub disk_api_url: Option<String>,
    pub share_host: Option<String>,
    pub share_host_aliases: Option<Vec<String>>,
    /// Externally visible base URL of the proxy
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    pub user_agent: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    pub max_redirects: Option<usize>,
    pub system_proxy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();

        let resolver = match self.resolver {
            Some(r) => {
                let d = ResolverConfig::default();
                ResolverConfig {
                    mode: r.mode.unwrap_or(d.mode),
                    playlist_host: r.playlist_host.unwrap_or(d.playlist_host),
                    disk_api_url: r.disk_api_url.unwrap_or(d.disk_api_url),
                    share_host: r.share_host.unwrap_or(d.share_host),
                    share_host_aliases: r.share_host_aliases.unwrap_or(d.share_host_aliases),
                    public_base_url: r.public_base_url,
                }
            }
            None => defaults.resolver,
        };

        let upstream = match self.upstream {
            Some(u) => {
                let d = UpstreamConfig::default();
                UpstreamConfig {
                    user_agent: u.user_agent.unwrap_or(d.user_agent),
                    timeout_secs: u.timeout_secs,
                    max_redirects: u.max_redirects.unwrap_or(d.max_redirects),
                    system_proxy: u.system_proxy.unwrap_or(d.system_proxy),
                }
            }
            None => defaults.upstream,
        };

        let (log_level, log_format) = match self.logging {
            Some(l) => (l.level, l.format.unwrap_or(defaults.log_format)),
            None => (defaults.log_level, defaults.log_format),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level,
            log_format,
            resolver,
            upstream,
        }
    }
}
