//! Local copies of every college's logo, keyed by a filesystem-safe version of the college name.

use crate::feeds::fetch::{write_replacing, FeedSource};
use crate::feeds::{lenient, lenient_list, read_snapshot, FeedKind};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const DEFAULT_LOGO_EXTENSION: &str = ".jpg";

/// `robot_data.json`. we only care about the logos
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RobotDataFeed {
    #[serde(default, deserialize_with = "lenient_list")]
    pub zones: Vec<RobotZone>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct RobotZone {
    #[serde(default, deserialize_with = "lenient_list")]
    pub teams: Vec<RobotTeam>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RobotTeam {
    #[serde(default, deserialize_with = "lenient")]
    pub college_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub college_logo: Option<String>,
}

/// college name -> logo url, skipping teams missing either. if a college shows up more than once
/// the last url wins
pub fn logo_urls(feed: &RobotDataFeed) -> BTreeMap<String, String> {
    feed.zones
        .iter()
        .flat_map(|z| z.teams.iter())
        .filter_map(|t| match (&t.college_name, &t.college_logo) {
            (Some(name), Some(url)) if !name.is_empty() && !url.is_empty() => {
                Some((name.clone(), url.clone()))
            }
            _ => None,
        })
        .collect()
}

/// everything that isn't alphanumeric, `_` or `-` becomes `_`
pub fn safe_file_stem(college_name: &str) -> String {
    college_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// ".png" etc, from the url's path. ".jpg" if there isn't one
pub fn logo_extension(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .and_then(|e| e.to_str())
                .filter(|e| !e.is_empty())
                .map(|e| format!(".{e}"))
        })
        .unwrap_or_else(|| DEFAULT_LOGO_EXTENSION.to_string())
}

pub fn logo_file_name(college_name: &str, url: &str) -> String {
    format!("{}{}", safe_file_stem(college_name), logo_extension(url))
}

/// the cached logo for `college_name`, whatever its extension
pub async fn find_logo(logo_dir: &Path, college_name: &str) -> Option<PathBuf> {
    let stem = safe_file_stem(college_name);
    let mut entries = match tokio::fs::read_dir(logo_dir).await {
        Ok(e) => e,
        Err(e) => {
            debug!("Can't read logo dir {}: {e}", logo_dir.display());
            return None;
        }
    };
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()) {
                    return Some(path);
                }
            }
            Ok(None) => return None,
            Err(e) => {
                debug!("Error listing logo dir {}: {e}", logo_dir.display());
                return None;
            }
        }
    }
}

/// true if the file is missing or older than `max_age`
pub async fn needs_refresh(path: &Path, max_age: Duration) -> bool {
    let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
        Ok(m) => m,
        Err(_) => return true,
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age > max_age,
        // modified in the future, whatever
        Err(_) => false,
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LogoReport {
    pub downloaded: Vec<String>,
    pub fresh: usize,
    pub failed: Vec<String>,
}

/// downloads the logo of every college in the robot-data snapshot whose cached copy is missing or
/// stale
pub async fn refresh_logos<S: FeedSource + ?Sized>(
    source: &S,
    data_dir: &Path,
    logo_dir: &Path,
    max_age: Duration,
) -> Result<LogoReport, std::io::Error> {
    let feed: RobotDataFeed = read_snapshot(data_dir, FeedKind::RobotData).await;
    let urls = logo_urls(&feed);
    tokio::fs::create_dir_all(logo_dir).await?;

    let mut report = LogoReport::default();
    for (college, url) in urls {
        let path = logo_dir.join(logo_file_name(&college, &url));
        if !needs_refresh(&path, max_age).await {
            report.fresh += 1;
            continue;
        }
        let result = match source.fetch_url(&url).await {
            Ok(bytes) => write_replacing(&path, &bytes).await.map_err(Into::into),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                debug!("Downloaded logo for {college}");
                report.downloaded.push(college);
            }
            Err(e) => {
                warn!("Failed to download logo for {college} from {url}: {e}");
                report.failed.push(college);
            }
        }
    }
    info!(
        "Logo refresh done: {} downloaded, {} already fresh, {} failed",
        report.downloaded.len(),
        report.fresh,
        report.failed.len()
    );
    Ok(report)
}
