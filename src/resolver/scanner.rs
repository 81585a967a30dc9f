//! Per-candidate scan: page body, then external scripts, then inline scripts.

use reqwest::Client;
use url::Url;

use super::patterns::{inline_scripts, script_sources, PlaylistPattern};
use super::Probe;
use crate::error::Result;

/// A fetched page: body text and the URL it was served from after redirects.
#[derive(Debug)]
pub struct Page {
    pub final_url: Url,
    pub body: String,
}

pub struct Scanner<'a> {
    client: &'a Client,
    pattern: &'a PlaylistPattern,
}

impl<'a> Scanner<'a> {
    pub fn new(client: &'a Client, pattern: &'a PlaylistPattern) -> Self {
        Self { client, pattern }
    }

    /// Fetch `url` following redirects. An unreadable body counts as empty.
    async fn fetch_text(&self, url: &str) -> Result<Page> {
        let response = self.client.get(url).send().await?;
        let final_url = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", final_url, e);
                String::new()
            }
        };
        Ok(Page { final_url, body })
    }

    /// Scan one candidate. The first match of any phase wins.
    pub async fn scan(&self, src: &str) -> Option<String> {
        let page = match self.fetch_text(src).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Candidate {} could not be fetched: {}", src, e);
                return None;
            }
        };

        if let Probe::Found(url) = self.probe_body(&page) {
            tracing::debug!("Playlist found in page body of {}", src);
            return Some(url);
        }

        for script_url in resolve_script_urls(&page) {
            match self.probe_script(&script_url).await {
                Probe::Found(url) => {
                    tracing::debug!("Playlist found in external script {}", script_url);
                    return Some(url);
                }
                Probe::Failed(e) => {
                    tracing::debug!("Script {} skipped: {}", script_url, e);
                }
                Probe::Absent => {}
            }
        }

        for (n, script) in inline_scripts(&page.body).into_iter().enumerate() {
            if let Some(url) = self.pattern.find(script) {
                tracing::debug!("Playlist found in inline script #{} of {}", n, src);
                return Some(url);
            }
        }

        None
    }

    fn probe_body(&self, page: &Page) -> Probe {
        match self.pattern.find(&page.body) {
            Some(url) => Probe::Found(url),
            None => Probe::Absent,
        }
    }

    async fn probe_script(&self, url: &Url) -> Probe {
        match self.fetch_text(url.as_str()).await {
            Ok(script) => match self.pattern.find(&script.body) {
                Some(found) => Probe::Found(found),
                None => Probe::Absent,
            },
            Err(e) => Probe::Failed(e),
        }
    }
}

/// Absolute http(s) URLs of the page's external scripts, in document order.
/// References that do not resolve are dropped.
pub fn resolve_script_urls(page: &Page) -> Vec<Url> {
    script_sources(&page.body)
        .into_iter()
        .filter_map(|src| page.final_url.join(src).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect()
}
