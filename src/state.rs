//! Application state
//!
//! Everything here is built once at startup and only read afterwards:
//! - Server configuration
//! - Outbound HTTP client
//! - Playlist resolver

use reqwest::{redirect, Client};

use crate::config::ServerConfig;
use crate::error::{ProxyError, Result};
use crate::resolver::Resolver;

pub struct AppState {
    pub config: ServerConfig,
    pub http_client: Client,
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let http_client = build_client(&config)?;
        let resolver = Resolver::new(http_client.clone(), config.resolver.clone())?;
        Ok(Self {
            config,
            http_client,
            resolver,
        })
    }
}

fn build_client(config: &ServerConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.upstream.user_agent.as_str())
        .redirect(redirect::Policy::limited(config.upstream.max_redirects));
    if let Some(timeout) = config.upstream.timeout() {
        builder = builder.timeout(timeout);
    }
    if !config.upstream.system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| ProxyError::Config(format!("failed to build HTTP client: {}", e)))
}
