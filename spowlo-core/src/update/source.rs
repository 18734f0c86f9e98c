//! Remote release sources.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::release::{ReleaseAsset, ReleaseDescriptor};
use super::version::{ParseVersionError, Version};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Release server returned HTTP {status}")]
    Status { status: u16 },
    #[error("Malformed release data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Version(#[from] ParseVersionError),
}

/// Somewhere release metadata can be fetched from.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// All published releases, in any order.
    async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, UpdateError>;
}

// ============================================================================
// GitHub Releases
// ============================================================================

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
    html_url: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    content_type: Option<String>,
    /// `sha256:<hex>` on newer API responses.
    #[serde(default)]
    digest: Option<String>,
}

impl From<GithubAsset> for ReleaseAsset {
    fn from(asset: GithubAsset) -> Self {
        let sha256 = asset
            .digest
            .as_deref()
            .and_then(|d| d.strip_prefix("sha256:"))
            .map(str::to_lowercase);
        Self {
            name: asset.name,
            download_url: asset.browser_download_url,
            size: asset.size,
            content_type: asset.content_type,
            sha256,
        }
    }
}

/// Releases of a GitHub repository.
#[derive(Debug, Clone)]
pub struct GithubReleases {
    client: reqwest::Client,
    owner: String,
    repo: String,
    timeout: Duration,
}

impl GithubReleases {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            owner: owner.into(),
            repo: repo.into(),
            timeout,
        }
    }

    fn releases_url(&self) -> String {
        format!("{}/repos/{}/{}/releases", GITHUB_API, self.owner, self.repo)
    }

    fn map_error(&self, e: reqwest::Error) -> UpdateError {
        if e.is_timeout() {
            UpdateError::Timeout(self.timeout)
        } else {
            UpdateError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl UpdateSource for GithubReleases {
    async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, UpdateError> {
        let url = self.releases_url();
        debug!(url = %url, "Fetching releases");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", format!("spowlo/{}", crate::VERSION))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, url = %url, "Failed to fetch releases");
            return Err(UpdateError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.map_error(e))?;
        let releases = parse_releases(&text)?;
        info!(count = releases.len(), repo = %self.repo, "Fetched releases");
        Ok(releases)
    }
}

/// Map a GitHub `/releases` response to descriptors.
///
/// Drafts and releases whose tag is not a version are skipped.
pub fn parse_releases(json: &str) -> Result<Vec<ReleaseDescriptor>, UpdateError> {
    let raw: Vec<GithubRelease> = serde_json::from_str(json)?;

    Ok(raw
        .into_iter()
        .filter(|r| !r.draft)
        .filter_map(|r| match Version::parse(&r.tag_name) {
            Ok(version) => Some(ReleaseDescriptor {
                version,
                name: r.name.unwrap_or_default(),
                body: r.body.unwrap_or_default(),
                prerelease: r.prerelease || version.is_prerelease(),
                published_at: r.published_at,
                page_url: r.html_url,
                assets: r.assets.into_iter().map(ReleaseAsset::from).collect(),
                tag: r.tag_name,
            }),
            Err(e) => {
                warn!(tag = %r.tag_name, error = %e, "Skipping release with unrecognised tag");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::checker::select_latest_eligible;
    use crate::update::release::UpdateChannel;

    const SAMPLE: &str = r###"[
        {
            "tag_name": "v1.2.0-beta.1",
            "name": "Spowlo 1.2.0 beta 1",
            "body": "Testing build",
            "prerelease": true,
            "draft": false,
            "html_url": "https://github.com/BobbyESP/Spowlo/releases/tag/v1.2.0-beta.1",
            "published_at": "2023-02-01T10:00:00Z",
            "assets": []
        },
        {
            "tag_name": "v1.1.0",
            "name": null,
            "body": "## Changes\n- Fixes",
            "prerelease": false,
            "draft": false,
            "html_url": "https://github.com/BobbyESP/Spowlo/releases/tag/v1.1.0",
            "published_at": "2023-01-15T10:00:00Z",
            "assets": [
                {
                    "name": "spowlo-1.1.0-linux-x86_64.tar.gz",
                    "browser_download_url": "https://github.com/BobbyESP/Spowlo/releases/download/v1.1.0/spowlo-1.1.0-linux-x86_64.tar.gz",
                    "size": 2048,
                    "content_type": "application/gzip",
                    "digest": "sha256:ABCDEF"
                }
            ]
        },
        {
            "tag_name": "v1.3.0",
            "draft": true,
            "html_url": "https://github.com/BobbyESP/Spowlo/releases/tag/v1.3.0"
        },
        {
            "tag_name": "nightly",
            "html_url": "https://github.com/BobbyESP/Spowlo/releases/tag/nightly"
        }
    ]"###;

    #[test]
    fn test_parse_releases_maps_fields() {
        let releases = parse_releases(SAMPLE).unwrap();
        assert_eq!(releases.len(), 2);

        let beta = &releases[0];
        assert!(beta.prerelease);
        assert_eq!(beta.version, Version::parse("1.2.0-beta.1").unwrap());
        assert!(beta.published_at.is_some());

        let stable = &releases[1];
        assert!(!stable.prerelease);
        assert_eq!(stable.name, "");
        assert_eq!(stable.display_title(), "v1.1.0");
        assert_eq!(stable.assets.len(), 1);
        assert_eq!(stable.assets[0].size, 2048);
        assert_eq!(stable.assets[0].sha256.as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_prerelease_tag_marks_prerelease() {
        let json = r#"[{
            "tag_name": "2.0.0-rc.1",
            "prerelease": false,
            "html_url": "https://github.com/BobbyESP/Spowlo/releases/tag/2.0.0-rc.1"
        }]"#;
        let releases = parse_releases(json).unwrap();
        assert!(releases[0].prerelease);
    }

    #[test]
    fn test_release_notes_with_headings_survive() {
        let releases = parse_releases(SAMPLE).unwrap();
        assert_eq!(releases[1].body, "## Changes\n- Fixes");
    }

    #[test]
    fn test_flagged_plain_tag_only_on_prerelease_channel() {
        let json = r#"[{
            "tag_name": "v4.1.0",
            "prerelease": true,
            "html_url": "https://github.com/BobbyESP/Spowlo/releases/tag/v4.1.0"
        }]"#;
        let releases = parse_releases(json).unwrap();
        assert!(releases[0].prerelease);

        assert!(select_latest_eligible(releases.clone(), UpdateChannel::Stable).is_none());
        let picked = select_latest_eligible(releases, UpdateChannel::PreRelease).unwrap();
        assert_eq!(picked.tag, "v4.1.0");
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_releases("{\"message\": \"Not Found\"}").unwrap_err();
        assert!(matches!(err, UpdateError::Malformed(_)));
    }

    #[test]
    fn test_releases_url() {
        let source = GithubReleases::new("BobbyESP", "Spowlo", Duration::from_secs(5));
        assert_eq!(
            source.releases_url(),
            "https://api.github.com/repos/BobbyESP/Spowlo/releases"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UpdateError::Status { status: 403 }.to_string(),
            "Release server returned HTTP 403"
        );
        assert_eq!(
            UpdateError::Timeout(Duration::from_secs(3)).to_string(),
            "Request timed out after 3s"
        );
    }
}
