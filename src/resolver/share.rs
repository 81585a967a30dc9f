//! Public share links and the download API lookup.

use reqwest::Client;
use serde::Deserialize;

use super::patterns::static_regex;
use super::Probe;
use crate::config::ResolverConfig;

/// Path shape of a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareKind {
    /// `/d/<id>`
    Folder,
    /// `/i/<id>`
    Item,
}

impl ShareKind {
    fn path_prefix(self) -> &'static str {
        match self {
            ShareKind::Folder => "d",
            ShareKind::Item => "i",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub kind: ShareKind,
    pub id: String,
}

impl ShareLink {
    /// Find a `/d/<id>` or `/i/<id>` segment. `/d/` wins when both appear.
    pub fn parse(target: &str) -> Option<ShareLink> {
        if let Some(caps) = static_regex!(r"(?i)/d/([^/?#]+)").captures(target) {
            return Some(ShareLink {
                kind: ShareKind::Folder,
                id: caps[1].to_string(),
            });
        }
        static_regex!(r"(?i)/i/([^/?#]+)")
            .captures(target)
            .map(|caps| ShareLink {
                kind: ShareKind::Item,
                id: caps[1].to_string(),
            })
    }

    /// Public key as accepted by the download API.
    pub fn public_key(&self, share_host: &str) -> String {
        format!(
            "https://{}/{}/{}",
            share_host,
            self.kind.path_prefix(),
            self.id
        )
    }
}

/// Replace alias hosts by the canonical regional host.
pub fn normalize_share_host(target: &str, config: &ResolverConfig) -> String {
    config
        .share_host_aliases
        .iter()
        .fold(target.to_string(), |acc, alias| {
            acc.replace(alias.as_str(), &config.share_host)
        })
}

#[derive(Debug, Deserialize)]
struct DownloadLink {
    href: Option<String>,
}

/// Ask the public download API for a direct href of a share link.
///
/// Returns `Probe::Absent` when `target` is not a share link or the API
/// answer carries no href.
pub async fn lookup_download_href(client: &Client, config: &ResolverConfig, target: &str) -> Probe {
    let normalized = normalize_share_host(target, config);
    let Some(link) = ShareLink::parse(&normalized) else {
        return Probe::Absent;
    };
    let public_key = link.public_key(&config.share_host);
    tracing::debug!("Share link detected, querying download API for {}", public_key);

    let response = match client
        .get(&config.disk_api_url)
        .query(&[("public_key", public_key.as_str())])
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return Probe::Failed(e.into()),
    };

    match response.json::<DownloadLink>().await {
        Ok(DownloadLink { href: Some(href) }) if !href.is_empty() => Probe::Found(href),
        Ok(_) => Probe::Absent,
        Err(e) => Probe::Failed(e.into()),
    }
}
