//! The competition organiser's public JSON feeds.
//!
//! Snapshots of each feed are fetched out-of-band (see [fetch]) and written to the data directory.
//! Everything in here treats those snapshots as untrusted: a missing file, a file that isn't JSON,
//! or a section with the wrong shape all decode to an empty default instead of an error. The
//! `lenient*` deserializers below are where that happens, so feed types should route every field
//! through one of them.

use enum_iterator::Sequence;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod fetch;
pub mod logos;
pub mod replays;
pub mod schedule;
pub mod standings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum FeedKind {
    /// per-zone team list, used for college logos
    RobotData,
    Schedule,
    Replays,
    /// per-group standings
    GroupRank,
}

impl FeedKind {
    /// both the remote name and the snapshot file name
    pub fn file_name(&self) -> &'static str {
        match self {
            FeedKind::RobotData => "robot_data.json",
            FeedKind::Schedule => "schedule.json",
            FeedKind::Replays => "simple_cms.json",
            FeedKind::GroupRank => "group_rank_info.json",
        }
    }
}

pub fn snapshot_path(data_dir: &Path, kind: FeedKind) -> PathBuf {
    data_dir.join(kind.file_name())
}

/// decodes a feed document. anything that isn't JSON at all gives you the empty document
pub fn parse_document<T: DeserializeOwned + Default>(raw: &str) -> T {
    match serde_json::from_str(raw) {
        Ok(t) => t,
        Err(e) => {
            warn!("Unable to parse feed document: {e}");
            T::default()
        }
    }
}

/// reads and decodes the latest snapshot of `kind`
pub fn load_snapshot<T: DeserializeOwned + Default>(data_dir: &Path, kind: FeedKind) -> T {
    let path = snapshot_path(data_dir, kind);
    decode_snapshot(&path, std::fs::read_to_string(&path))
}

/// [load_snapshot] for use from the workers
pub async fn read_snapshot<T: DeserializeOwned + Default>(data_dir: &Path, kind: FeedKind) -> T {
    let path = snapshot_path(data_dir, kind);
    decode_snapshot(&path, tokio::fs::read_to_string(&path).await)
}

fn decode_snapshot<T: DeserializeOwned + Default>(path: &Path, read: std::io::Result<String>) -> T {
    match read {
        Ok(raw) => parse_document(&raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No snapshot at {}", path.display());
            T::default()
        }
        Err(e) => {
            warn!("Error reading snapshot {}: {e}", path.display());
            T::default()
        }
    }
}

/// decodes into `T`, or `T::default()` if the value is missing, null, or the wrong shape
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        debug!("Ignoring malformed feed field: {e}");
        T::default()
    }))
}

/// decodes a list, dropping elements that don't fit `T`. anything that isn't a list is empty
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let elements = match value {
        Value::Array(elements) => elements,
        Value::Null => vec![],
        other => {
            debug!("Expected a list in feed, got {other}");
            vec![]
        }
    };
    Ok(elements
        .into_iter()
        .filter_map(|v| match serde_json::from_value(v) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!("Dropping malformed feed element: {e}");
                None
            }
        })
        .collect())
}

/// ids show up as numbers in some feeds and strings in others; normalize to strings.
/// empty strings count as missing
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_string(&value).filter(|s| !s.is_empty()))
}

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// numbers or numeric strings; anything else is 0
pub(crate) fn value_as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// integers or integer strings; anything else is 0
pub(crate) fn value_as_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{lenient, lenient_id, lenient_list, parse_document, value_as_f64, value_as_i64};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Default, Debug)]
    struct Inner {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
    }

    #[derive(Deserialize, Default, Debug)]
    struct Doc {
        #[serde(default, deserialize_with = "lenient_list")]
        things: Vec<Inner>,
        #[serde(default, deserialize_with = "lenient")]
        inner: Option<Inner>,
        #[serde(default, deserialize_with = "lenient_id")]
        id: Option<String>,
    }

    #[test]
    fn test_missing_and_null_sections() {
        let d: Doc = parse_document("{}");
        assert!(d.things.is_empty());
        assert!(d.inner.is_none());
        let d: Doc = parse_document(r#"{"things": null, "inner": null, "id": null}"#);
        assert!(d.things.is_empty());
        assert!(d.inner.is_none());
        assert!(d.id.is_none());
    }

    #[test]
    fn test_wrong_shapes() {
        let d: Doc = parse_document(r#"{"things": "nope", "inner": [1, 2], "id": {"a": 1}}"#);
        assert!(d.things.is_empty());
        assert!(d.inner.is_none());
        assert!(d.id.is_none());

        let d: Doc = parse_document(r#"{"things": [{"name": "a"}, 7, {"name": 3}, {}]}"#);
        let names = d.things.iter().map(|t| t.name.clone()).collect::<Vec<_>>();
        assert_eq!(vec![Some("a".to_string()), None, None], names);
    }

    #[test]
    fn test_not_json() {
        let d: Doc = parse_document("<html>502 Bad Gateway</html>");
        assert!(d.things.is_empty());
    }

    #[test]
    fn test_ids() {
        let d: Doc = parse_document(r#"{"id": 12345}"#);
        assert_eq!(Some("12345".to_string()), d.id);
        let d: Doc = parse_document(r#"{"id": "12345"}"#);
        assert_eq!(Some("12345".to_string()), d.id);
        let d: Doc = parse_document(r#"{"id": ""}"#);
        assert_eq!(None, d.id);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(3, value_as_i64(&json!(3)));
        assert_eq!(3, value_as_i64(&json!("3")));
        assert_eq!(0, value_as_i64(&json!("three")));
        assert_eq!(0, value_as_i64(&json!(null)));
        assert_eq!(-12.5, value_as_f64(&json!(-12.5)));
        assert_eq!(40.0, value_as_f64(&json!(" 40 ")));
        assert_eq!(0.0, value_as_f64(&json!([1])));
    }
}
