//! Group standings from `group_rank_info.json`.
//!
//! The feed doesn't give you records, it gives you a table: each team ("slot") is a list of
//! `{itemName, itemValue}` cells labeled in Chinese. [StandingsLabel] is the set of labels we
//! understand; everything else is skipped.

use crate::constants::{
    UNKNOWN_COLLEGE_NAME, UNKNOWN_GROUP_NAME, UNKNOWN_TEAM_NAME, UNKNOWN_ZONE_NAME,
};
use crate::feeds::{lenient, lenient_list, value_as_f64, value_as_i64, value_as_string};
use crate::models::team::Team;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct GroupRankFeed {
    #[serde(default, deserialize_with = "lenient_list")]
    pub zones: Vec<RankZone>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RankZone {
    #[serde(default, deserialize_with = "lenient")]
    pub zone_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub groups: Vec<RankGroup>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RankGroup {
    #[serde(default, deserialize_with = "lenient")]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub group_players: Vec<StandingsRow>,
}

/// one team's cells. a malformed cell is dropped on its own instead of taking the team with it
#[derive(Debug, Default, Clone)]
pub struct StandingsRow(pub Vec<LabeledItem>);

impl<'de> Deserialize<'de> for StandingsRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_list(deserializer).map(StandingsRow)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LabeledItem {
    #[serde(default, deserialize_with = "lenient")]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsLabel {
    /// 战队: an object with the college and team names
    Team,
    /// 胜/平/负: "wins/draws/losses"
    Record,
    /// 胜场数
    Wins,
    /// 对手分
    OpponentScore,
    /// 局均总基地净胜血量
    BaseHpDiff,
    /// 局均总前哨站净胜血量
    OutpostHpDiff,
    /// 局均全队总伤害血量
    TotalDamage,
}

impl StandingsLabel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "战队" => Some(Self::Team),
            "胜/平/负" => Some(Self::Record),
            "胜场数" => Some(Self::Wins),
            "对手分" => Some(Self::OpponentScore),
            "局均总基地净胜血量" => Some(Self::BaseHpDiff),
            "局均总前哨站净胜血量" => Some(Self::OutpostHpDiff),
            "局均全队总伤害血量" => Some(Self::TotalDamage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRecord {
    pub college_name: String,
    pub team_name: String,
    pub college_logo: String,
    /// as displayed, e.g. "5/1/2"
    pub record: Option<String>,
    pub wins: i64,
    pub losses: i64,
    pub opponent_score: f64,
    pub base_hp_diff: f64,
    pub outpost_hp_diff: f64,
    pub total_damage: f64,
}

impl Default for StandingsRecord {
    fn default() -> Self {
        Self {
            college_name: UNKNOWN_COLLEGE_NAME.to_string(),
            team_name: UNKNOWN_TEAM_NAME.to_string(),
            college_logo: String::new(),
            record: None,
            wins: 0,
            losses: 0,
            opponent_score: 0.0,
            base_hp_diff: 0.0,
            outpost_hp_diff: 0.0,
            total_damage: 0.0,
        }
    }
}

impl StandingsRecord {
    /// `None` if none of the cells had a label we know
    pub fn from_cells(cells: &[LabeledItem]) -> Option<Self> {
        let mut record = Self::default();
        let mut recognized = false;
        for cell in cells {
            let label = match cell.item_name.as_deref().and_then(StandingsLabel::from_label) {
                Some(l) => l,
                None => continue,
            };
            recognized = true;
            let v = &cell.item_value;
            match label {
                StandingsLabel::Team => {
                    let field = |name: &str, default: &str| {
                        v.get(name)
                            .and_then(value_as_string)
                            .unwrap_or_else(|| default.to_string())
                    };
                    record.college_name = field("collegeName", UNKNOWN_COLLEGE_NAME);
                    record.team_name = field("teamName", UNKNOWN_TEAM_NAME);
                    record.college_logo = field("collegeLogo", "");
                }
                StandingsLabel::Record => {
                    record.record = value_as_string(v);
                    record.losses = v.as_str().map(parse_losses).unwrap_or(0);
                }
                StandingsLabel::Wins => record.wins = value_as_i64(v),
                StandingsLabel::OpponentScore => record.opponent_score = value_as_f64(v),
                StandingsLabel::BaseHpDiff => record.base_hp_diff = value_as_f64(v),
                StandingsLabel::OutpostHpDiff => record.outpost_hp_diff = value_as_f64(v),
                StandingsLabel::TotalDamage => record.total_damage = value_as_f64(v),
            }
        }
        recognized.then_some(record)
    }

    /// ranking order, best first: more wins, fewer losses, then the tiebreak stats (all higher is
    /// better)
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .wins
            .cmp(&self.wins)
            .then_with(|| self.losses.cmp(&other.losses))
            .then_with(|| other.opponent_score.total_cmp(&self.opponent_score))
            .then_with(|| other.base_hp_diff.total_cmp(&self.base_hp_diff))
            .then_with(|| other.outpost_hp_diff.total_cmp(&self.outpost_hp_diff))
            .then_with(|| other.total_damage.total_cmp(&self.total_damage))
    }
}

/// the loss count out of a "wins/draws/losses" string. anything that isn't exactly three parts
/// with a numeric last part is 0
pub fn parse_losses(record: &str) -> i64 {
    let parts = record.split('/').collect::<Vec<_>>();
    match parts.as_slice() {
        [_, _, losses] => losses.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStandings {
    pub name: String,
    /// best first
    pub teams: Vec<StandingsRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneStandings {
    pub name: String,
    pub groups: Vec<GroupStandings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standings {
    pub zones: Vec<ZoneStandings>,
    /// school name -> local team id, for linking rows to team pages
    pub team_links: HashMap<String, i32>,
}

impl Standings {
    /// the local team for a standings row, if we track that school
    pub fn team_id_for(&self, record: &StandingsRecord) -> Option<i32> {
        self.team_links.get(&record.college_name).copied()
    }
}

fn group_standings(group: &RankGroup) -> GroupStandings {
    let mut teams = group
        .group_players
        .iter()
        .filter_map(|row| StandingsRecord::from_cells(&row.0))
        .collect::<Vec<_>>();
    // stable, so equal records stay in feed order
    teams.sort_by(StandingsRecord::ranking_cmp);
    GroupStandings {
        name: group
            .group_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_GROUP_NAME.to_string()),
        teams,
    }
}

/// school -> team id. if two teams share a school the later one wins
pub fn school_links(teams: &[Team]) -> HashMap<String, i32> {
    teams.iter().map(|t| (t.school.clone(), t.id)).collect()
}

pub fn merge_standings(feed: &GroupRankFeed, teams: &[Team]) -> Standings {
    let zones = feed
        .zones
        .iter()
        .map(|zone| ZoneStandings {
            name: zone
                .zone_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_ZONE_NAME.to_string()),
            groups: zone.groups.iter().map(group_standings).collect(),
        })
        .collect();
    Standings {
        zones,
        team_links: school_links(teams),
    }
}
