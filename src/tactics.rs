//! The tactical checklist: which (category, item) notes every team is expected to have.
//!
//! A [TacticalSchema] is a plain value. Nothing in the crate reads it from global state; callers
//! load it once (see [crate::config::Config::tactical_schema]) and pass it to whatever needs it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// built-in checklist, one entry per robot role
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "步兵1",
        &[
            "构型", "大小符", "陡洞上", "陡洞下", "缓洞", "飞坡", "上台阶", "辅瞄", "初始弹量分配", "其他",
        ],
    ),
    (
        "步兵2",
        &[
            "构型", "大小符", "陡洞上", "陡洞下", "缓洞", "飞坡", "上台阶", "辅瞄", "初始弹量分配", "其他",
        ],
    ),
    (
        "步兵(备用)",
        &[
            "是否有", "构型", "大小符", "陡洞上", "陡洞下", "缓洞", "飞坡", "上台阶", "辅瞄",
            "初始弹量分配", "其他",
        ],
    ),
    (
        "英雄",
        &[
            "前哨站命中效率",
            "推前哨所需时间",
            "吊射点位1(缓洞口)",
            "吊射点位2(陡动口)",
            "吊射点位3(高地下)",
            "飞坡",
            "过洞",
            "初始弹量分配",
            "其他",
        ],
    ),
    (
        "英雄(备用)",
        &[
            "是否有",
            "前哨站命中效率",
            "推前哨所需时间",
            "吊射点位1(缓洞口)",
            "吊射点位2(陡动口)",
            "吊射点位3(高地下)",
            "飞坡",
            "过洞",
            "初始弹量分配",
            "其他",
        ],
    ),
    (
        "工程",
        &[
            "首矿时间", "局均经济", "开局抢矿策略", "捡地矿", "死亡是否掉矿", "挡拆策略", "其他",
        ],
    ),
    (
        "工程(备用)",
        &[
            "是否有", "首矿时间", "局均经济", "开局抢矿策略", "捡地矿", "死亡是否掉矿", "挡拆策略",
            "其他",
        ],
    ),
    ("飞镖", &["目标", "命中率", "其他"]),
    ("无人机", &["前哨站", "泼基地顶部", "泼基地底部", "地面", "其他"]),
    (
        "哨兵",
        &[
            "初始点位",
            "风格(前压or防守)",
            "巡航能力",
            "常见点位1",
            "常见点位2",
            "常见点位3",
            "堡垒",
            "地形跨越能力",
            "辅瞄",
            "对建筑能力",
            "其他",
        ],
    ),
    ("雷达", &["易伤触发时间1", "易伤触发时间2", "明显盲区", "其他"]),
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Error reading schema file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Error parsing schema file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Category {0:?} has no items")]
    EmptyCategory(String),
    #[error("Category {0:?} is listed more than once")]
    DuplicateCategory(String),
    #[error("Item {item:?} is listed more than once in category {category:?}")]
    DuplicateItem { category: String, item: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalCategory {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TacticalKey {
    pub category: String,
    pub item: String,
}

impl TacticalKey {
    pub fn new<S: Into<String>>(category: S, item: S) -> Self {
        Self {
            category: category.into(),
            item: item.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TacticalSchema {
    categories: Vec<TacticalCategory>,
}

impl TacticalSchema {
    pub fn new(categories: Vec<TacticalCategory>) -> Result<Self, SchemaError> {
        let mut seen_categories = HashSet::new();
        for c in &categories {
            if c.items.is_empty() {
                return Err(SchemaError::EmptyCategory(c.name.clone()));
            }
            if !seen_categories.insert(c.name.as_str()) {
                return Err(SchemaError::DuplicateCategory(c.name.clone()));
            }
            let mut seen_items = HashSet::new();
            for item in &c.items {
                if !seen_items.insert(item.as_str()) {
                    return Err(SchemaError::DuplicateItem {
                        category: c.name.clone(),
                        item: item.clone(),
                    });
                }
            }
        }
        Ok(Self { categories })
    }

    /// expects a JSON list of `{"name": ..., "items": [...]}` objects
    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        let categories: Vec<TacticalCategory> = serde_json::from_str(s)?;
        Self::new(categories)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn categories(&self) -> &[TacticalCategory] {
        &self.categories
    }

    pub fn contains(&self, category: &str, item: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.name == category && c.items.iter().any(|i| i == item))
    }

    /// every (category, item) pair, in checklist order
    pub fn keys(&self) -> impl Iterator<Item = TacticalKey> + '_ {
        self.categories.iter().flat_map(|c| {
            c.items
                .iter()
                .map(move |item| TacticalKey::new(c.name.as_str(), item.as_str()))
        })
    }

    pub fn key_set(&self) -> HashSet<TacticalKey> {
        self.keys().collect()
    }

    /// number of (category, item) pairs
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// buckets `things` by category, in checklist order. every category gets a bucket, even if
    /// it's empty; things whose category isn't in the checklist are dropped
    pub fn categorize<T, F>(&self, things: Vec<T>, category_of: F) -> Vec<(String, Vec<T>)>
    where
        F: Fn(&T) -> &str,
    {
        let mut buckets: Vec<(String, Vec<T>)> = self
            .categories
            .iter()
            .map(|c| (c.name.clone(), vec![]))
            .collect();
        for thing in things {
            let idx = buckets
                .iter()
                .position(|(name, _)| name.as_str() == category_of(&thing));
            if let Some(idx) = idx {
                buckets[idx].1.push(thing);
            }
        }
        buckets
    }
}

impl Default for TacticalSchema {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, items)| TacticalCategory {
                    name: name.to_string(),
                    items: items.iter().map(|i| i.to_string()).collect(),
                })
                .collect(),
        }
    }
}
