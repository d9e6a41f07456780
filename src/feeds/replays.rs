use crate::constants::NO_REPLAY_URL;
use crate::feeds::{lenient, lenient_id, lenient_list};
use serde::Deserialize;
use std::collections::HashMap;

/// `simple_cms.json`
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ReplayFeed {
    #[serde(default, deserialize_with = "lenient_list")]
    pub simple_cms: Vec<CmsItem>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CmsItem {
    #[serde(default, deserialize_with = "lenient")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<CmsContent>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CmsContent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub match_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub main_remote_url: Option<String>,
}

/// match id -> replay url
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayLinks(HashMap<String, String>);

impl ReplayLinks {
    /// only active items with both a match id and a url count. later items win
    pub fn from_feed(feed: &ReplayFeed) -> Self {
        Self(
            feed.simple_cms
                .iter()
                .filter(|item| item.is_active)
                .filter_map(|item| item.content.as_ref())
                .filter_map(|c| match (&c.match_id, &c.main_remote_url) {
                    (Some(id), Some(url)) if !url.is_empty() => Some((id.clone(), url.clone())),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn get(&self, match_id: &str) -> Option<&str> {
        self.0.get(match_id).map(String::as_str)
    }

    /// the replay url, or "#" if there isn't one
    pub fn url_for(&self, match_id: Option<&str>) -> String {
        match_id
            .and_then(|id| self.get(id))
            .unwrap_or(NO_REPLAY_URL)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
