//! Playlist discovery
//!
//! Turns a user supplied page link into the URL of an HLS master playlist:
//! - target normalization
//! - share link lookup through the public download API
//! - ordered candidate scanning (page body, external scripts, inline scripts)
//!
//! Every probe either finds a playlist, finds nothing, or fails. Failures are
//! logged and treated like "nothing found"; only the final absence of a match
//! reaches the caller.

pub mod patterns;
pub mod scanner;
pub mod share;

use reqwest::Client;

use crate::config::ResolverConfig;
use crate::error::{ProxyError, Result};
use patterns::{static_regex, PlaylistPattern};
use scanner::Scanner;

/// Outcome of a single best-effort probe.
#[derive(Debug)]
pub enum Probe {
    Found(String),
    Absent,
    Failed(ProxyError),
}

/// Where a candidate URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    DiskApiHref,
    ProvidedTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub src: String,
    pub source: CandidateSource,
}

/// Result of a discovery run.
#[derive(Debug, Default)]
pub struct Discovery {
    /// First playlist URL found.
    pub playlist: Option<String>,
    /// Candidate URLs in scan order.
    pub tested: Vec<String>,
}

/// Trim the raw `url` parameter and default it to https.
/// Returns None for a blank value.
pub fn normalize_target(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if static_regex!(r"(?i)^https?://").is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

pub struct Resolver {
    client: Client,
    config: ResolverConfig,
    pattern: PlaylistPattern,
}

impl Resolver {
    pub fn new(client: Client, config: ResolverConfig) -> Result<Self> {
        let pattern = PlaylistPattern::new(&config.playlist_host)
            .map_err(|e| ProxyError::Config(format!("invalid playlist_host: {}", e)))?;
        Ok(Self {
            client,
            config,
            pattern,
        })
    }

    /// Candidates in scan order: API href first, then the target itself.
    pub async fn candidates(&self, target: &str) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(2);

        match share::lookup_download_href(&self.client, &self.config, target).await {
            Probe::Found(href) => {
                tracing::info!("Download API resolved {} to {}", target, href);
                candidates.push(Candidate {
                    src: href,
                    source: CandidateSource::DiskApiHref,
                });
            }
            Probe::Failed(e) => {
                // Falls back to scanning the target page directly.
                tracing::warn!("Download API lookup for {} failed: {}", target, e);
            }
            Probe::Absent => {}
        }

        candidates.push(Candidate {
            src: target.to_string(),
            source: CandidateSource::ProvidedTarget,
        });
        candidates
    }

    /// Run the full discovery plan for a normalized target.
    pub async fn discover(&self, target: &str) -> Discovery {
        let candidates = self.candidates(target).await;
        let scanner = Scanner::new(&self.client, &self.pattern);
        let tested = candidates.iter().map(|c| c.src.clone()).collect();

        for candidate in &candidates {
            tracing::debug!("Scanning {:?} candidate {}", candidate.source, candidate.src);
            if let Some(playlist) = scanner.scan(&candidate.src).await {
                tracing::info!("Discovered playlist {} via {}", playlist, candidate.src);
                return Discovery {
                    playlist: Some(playlist),
                    tested,
                };
            }
        }

        Discovery {
            playlist: None,
            tested,
        }
    }
}
