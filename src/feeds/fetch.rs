//! Downloading the feed documents into the data directory.

use crate::feeds::{snapshot_path, FeedKind};
use enum_iterator::all;
use log::{debug, info, warn};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    BadStatus { url: String, status: u16 },
    #[error("{url} did not return JSON")]
    NotJson { url: String },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// something that can fetch a url's body. exists so the refresh logic can be tested without a
/// network
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedSource {
    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

pub fn feed_url(base_url: &str, kind: FeedKind) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), kind.file_name())
}

/// writes to a sibling temp file and renames it over `path`, so readers never see half a file
pub async fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), std::io::Error> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

/// fetches one feed and replaces its snapshot. returns the number of bytes written.
/// if this fails the old snapshot is left alone
pub async fn refresh_feed<S: FeedSource + ?Sized>(
    source: &S,
    base_url: &str,
    data_dir: &Path,
    kind: FeedKind,
) -> Result<usize, FetchError> {
    let url = feed_url(base_url, kind);
    let body = source.fetch_url(&url).await?;
    // an error page or a truncated download would wipe out a perfectly good snapshot
    if serde_json::from_slice::<serde_json::Value>(&body).is_err() {
        return Err(FetchError::NotJson { url });
    }
    tokio::fs::create_dir_all(data_dir).await?;
    write_replacing(&snapshot_path(data_dir, kind), &body).await?;
    debug!("Wrote {} bytes for {}", body.len(), kind.file_name());
    Ok(body.len())
}

#[derive(Debug, Default)]
pub struct RefreshReport {
    pub updated: Vec<FeedKind>,
    pub failed: Vec<(FeedKind, FetchError)>,
}

/// refreshes every feed. one feed failing doesn't stop the others
pub async fn refresh_snapshots<S: FeedSource + ?Sized>(
    source: &S,
    base_url: &str,
    data_dir: &Path,
) -> RefreshReport {
    let mut report = RefreshReport::default();
    for kind in all::<FeedKind>() {
        match refresh_feed(source, base_url, data_dir, kind).await {
            Ok(_) => {
                report.updated.push(kind);
            }
            Err(e) => {
                warn!("Failed to refresh {}: {e}", kind.file_name());
                report.failed.push((kind, e));
            }
        }
    }
    info!(
        "Feed refresh done: {} updated, {} failed",
        report.updated.len(),
        report.failed.len()
    );
    report
}
