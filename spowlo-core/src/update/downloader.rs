//! Streaming download of release assets.
//!
//! Assets are fetched over HTTPS from GitHub hosts only, hashed while they
//! stream to disk, and checked against the published SHA-256 when there is
//! one.

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::release::ReleaseAsset;

// ============================================================================
// URL Validation
// ============================================================================

/// Hosts release assets may be downloaded from (subdomains included).
const ALLOWED_DOMAINS: &[&str] = &["github.com", "githubusercontent.com"];

/// Checks that the URL is HTTPS and points at an allowed host.
fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str).with_context(|| format!("Invalid URL: {}", url_str))?;

    if url.scheme() != "https" {
        anyhow::bail!("URL must use HTTPS: {}", url_str);
    }

    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("URL must have a host: {}", url_str))?;

    let is_allowed = ALLOWED_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)));

    if !is_allowed {
        anyhow::bail!(
            "Download domain not allowed: {}. Allowed: {:?}",
            host,
            ALLOWED_DOMAINS
        );
    }

    Ok(())
}

// ============================================================================
// Progress
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    /// From Content-Length, falling back to the size the release advertises.
    pub total_bytes: Option<u64>,
    /// 0.0 to 100.0, or None if the total is unknown.
    pub percent: Option<f32>,
}

impl DownloadProgress {
    fn new(bytes_downloaded: u64, total_bytes: Option<u64>) -> Self {
        let percent = total_bytes.map(|total| {
            if total > 0 {
                (bytes_downloaded as f32 / total as f32) * 100.0
            } else {
                0.0
            }
        });

        Self {
            bytes_downloaded,
            total_bytes,
            percent,
        }
    }
}

// ============================================================================
// Download
// ============================================================================

/// Where an asset lands inside `dest_dir`. Path components in the asset
/// name are discarded.
pub fn asset_destination(asset: &ReleaseAsset, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = Path::new(&asset.name)
        .file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Asset has no usable file name: {:?}", asset.name))?;
    Ok(dest_dir.join(file_name))
}

/// Download a release asset into `dest_dir`, returning the written path.
///
/// The partial file is removed when the download fails part way, is
/// cancelled, or the checksum does not match.
pub async fn download_asset<F>(
    asset: &ReleaseAsset,
    dest_dir: &Path,
    cancel: &CancellationToken,
    progress_cb: F,
) -> Result<PathBuf>
where
    F: Fn(DownloadProgress),
{
    let dest = asset_destination(asset, dest_dir)?;
    info!(url = %asset.download_url, dest = %dest.display(), "Downloading update");

    validate_url(&asset.download_url)?;

    tokio::fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;

    let client = reqwest::Client::new();
    let response = client
        .get(&asset.download_url)
        .header("User-Agent", format!("spowlo/{}", crate::VERSION))
        .send()
        .await
        .with_context(|| format!("Failed to start download from {}", asset.download_url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!(
            "Download failed with status {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        );
    }

    let total_bytes = response
        .content_length()
        .or((asset.size > 0).then_some(asset.size));
    debug!(total_bytes = ?total_bytes, "Download size");

    let (bytes_downloaded, actual_hex) = write_chunks(
        &dest,
        response.bytes_stream(),
        cancel,
        total_bytes,
        &progress_cb,
    )
    .await?;

    if let Some(expected) = asset.sha256.as_deref() {
        if actual_hex != expected.to_lowercase() {
            let _ = tokio::fs::remove_file(&dest).await;
            anyhow::bail!(
                "SHA256 checksum mismatch!\nExpected: {}\nActual: {}",
                expected,
                actual_hex
            );
        }
        debug!(sha256 = %actual_hex, "Checksum verified");
    }

    info!(
        bytes = bytes_downloaded,
        dest = %dest.display(),
        "Download complete"
    );

    Ok(dest)
}

/// Stream `chunks` into a new file at `dest`, returning the byte count and
/// the hex SHA-256. Nothing is left at `dest` when this fails.
async fn write_chunks<S, B, E, F>(
    dest: &Path,
    chunks: S,
    cancel: &CancellationToken,
    total_bytes: Option<u64>,
    progress_cb: &F,
) -> Result<(u64, String)>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(DownloadProgress),
{
    let written = stream_to_file(dest, chunks, cancel, total_bytes, progress_cb).await;
    if written.is_err() {
        if let Err(e) = tokio::fs::remove_file(dest).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(dest = %dest.display(), "Failed to remove partial download: {}", e);
            }
        }
    }
    written
}

async fn stream_to_file<S, B, E, F>(
    dest: &Path,
    chunks: S,
    cancel: &CancellationToken,
    total_bytes: Option<u64>,
    progress_cb: &F,
) -> Result<(u64, String)>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(DownloadProgress),
{
    let mut file = File::create(dest)
        .await
        .with_context(|| format!("Failed to create file: {}", dest.display()))?;

    let mut chunks = std::pin::pin!(chunks);
    let mut bytes_downloaded: u64 = 0;
    let mut hasher = Sha256::new();

    progress_cb(DownloadProgress::new(0, total_bytes));

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(dest = %dest.display(), "Download cancelled");
                anyhow::bail!("Download cancelled");
            }
            next = chunks.next() => match next {
                Some(chunk) => chunk.context("Failed to read chunk from response stream")?,
                None => break,
            },
        };
        let chunk = chunk.as_ref();

        hasher.update(chunk);
        file.write_all(chunk)
            .await
            .context("Failed to write chunk to file")?;

        bytes_downloaded += chunk.len() as u64;
        progress_cb(DownloadProgress::new(bytes_downloaded, total_bytes));
    }

    file.flush().await.context("Failed to flush file")?;

    Ok((bytes_downloaded, format_sha256_hex(&hasher.finalize())))
}

fn format_sha256_hex(hash: &[u8]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}
