//! One team's matches out of `schedule.json`, seen from that team's side.

use crate::constants::{NO_REPLAY_URL, UNKNOWN_DAY, UNKNOWN_EVENT_TITLE};
use crate::feeds::replays::ReplayLinks;
use crate::feeds::{lenient, lenient_id, lenient_list};
use crate::models::team::Team;
use chrono::{Datelike, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const FEED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const DEFAULT_MATCH_TYPE: &str = "GROUP";
const DEFAULT_GAME_COUNT: i64 = 3;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScheduleFeed {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<ScheduleData>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScheduleData {
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<ScheduleEvent>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScheduleEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub zones: Nodes<ScheduleZone>,
}

/// the feed wraps every list in `{"nodes": [...]}`
#[derive(Deserialize, Debug, Clone)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Nodes<T> {
    #[serde(default, deserialize_with = "lenient_list")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: vec![] }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleZone {
    #[serde(default, deserialize_with = "lenient")]
    pub group_matches: Nodes<FeedMatch>,
    #[serde(default, deserialize_with = "lenient")]
    pub knockout_matches: Nodes<FeedMatch>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedMatch {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub match_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    /// "RED", "BLUE", or something else while the match is unplayed
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub plan_game_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub plan_started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub red_side: Option<FeedSide>,
    #[serde(default, deserialize_with = "lenient")]
    pub blue_side: Option<FeedSide>,
    #[serde(default, deserialize_with = "lenient")]
    pub red_side_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub red_side_win_game_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub blue_side_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub blue_side_win_game_count: Option<i64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct FeedSide {
    #[serde(default, deserialize_with = "lenient")]
    pub player: Option<FeedPlayer>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct FeedPlayer {
    #[serde(default, deserialize_with = "lenient")]
    pub team: Option<FeedTeam>,
    #[serde(default, deserialize_with = "lenient")]
    pub rank: Option<i64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedTeam {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub college_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub college_logo: Option<String>,
}

impl ScheduleFeed {
    fn event(&self) -> Option<&ScheduleEvent> {
        self.data.as_ref().and_then(|d| d.event.as_ref())
    }

    pub fn title(&self) -> &str {
        self.event()
            .and_then(|e| e.title.as_deref())
            .unwrap_or(UNKNOWN_EVENT_TITLE)
    }

    /// every match in every zone; each zone's group matches, then its knockout matches
    pub fn matches(&self) -> impl Iterator<Item = &FeedMatch> {
        self.event()
            .into_iter()
            .flat_map(|e| e.zones.nodes.iter())
            .flat_map(|z| z.group_matches.nodes.iter().chain(z.knockout_matches.nodes.iter()))
    }
}

impl FeedSide {
    fn team(&self) -> Option<&FeedTeam> {
        self.player.as_ref().and_then(|p| p.team.as_ref())
    }

    fn rank(&self) -> Option<i64> {
        self.player.as_ref().and_then(|p| p.rank)
    }
}

impl FeedMatch {
    fn side(&self, side: Side) -> Option<&FeedSide> {
        match side {
            Side::Red => self.red_side.as_ref(),
            Side::Blue => self.blue_side.as_ref(),
        }
    }

    fn college(&self, side: Side) -> Option<&str> {
        self.side(side)
            .and_then(FeedSide::team)
            .and_then(|t| t.college_name.as_deref())
    }

    /// which side `school` is playing on, if either. red if somehow both
    pub fn side_of(&self, school: &str) -> Option<Side> {
        if self.college(Side::Red) == Some(school) {
            Some(Side::Red)
        } else if self.college(Side::Blue) == Some(school) {
            Some(Side::Blue)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    /// how the feed spells this side in `result`
    pub fn as_result(&self) -> &'static str {
        match self {
            Side::Red => "RED",
            Side::Blue => "BLUE",
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    /// `None` if the result doesn't name either side (not played yet, draw, ...)
    pub fn is_win(&self, result: Option<&str>) -> Option<bool> {
        match result {
            Some(r) if r == self.as_result() => Some(true),
            Some(r) if r == self.opponent().as_result() => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Division {
    /// 分区赛, before July
    RegionalPhase,
    /// 全国总决赛与复活赛, July on
    NationalFinals,
}

impl Division {
    pub fn from_month(month: u32) -> Self {
        if month < 7 {
            Division::RegionalPhase
        } else {
            Division::NationalFinals
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Division::RegionalPhase => "分区赛",
            Division::NationalFinals => "全国总决赛与复活赛",
        }
    }
}

pub fn parse_feed_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, FEED_TIME_FORMAT).ok()
}

/// "event - division", or just the event title if we can't tell when the match is
pub fn match_title(event_title: &str, start: Option<&str>) -> String {
    match start.and_then(parse_feed_time) {
        Some(t) => format!(
            "{event_title} - {}",
            Division::from_month(t.month()).label()
        ),
        None => event_title.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalTime {
    pub formatted: String,
    /// day of the month, or "?"
    pub day: String,
}

/// converts a feed timestamp (UTC) into `tz`. unparseable times are passed through as-is
pub fn localize(raw: Option<&str>, tz: Tz) -> LocalTime {
    let raw = match raw {
        Some(r) => r,
        None => {
            return LocalTime {
                formatted: String::new(),
                day: UNKNOWN_DAY.to_string(),
            }
        }
    };
    match parse_feed_time(raw) {
        Some(naive) => {
            let local = Utc.from_utc_datetime(&naive).with_timezone(&tz);
            LocalTime {
                formatted: local.format(DISPLAY_TIME_FORMAT).to_string(),
                day: local.day().to_string(),
            }
        }
        None => {
            warn!("Unable to parse match time {raw:?}");
            LocalTime {
                formatted: raw.to_string(),
                day: UNKNOWN_DAY.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideSummary {
    pub name: String,
    pub college: String,
    pub logo: String,
    pub rank: Option<i64>,
}

impl SideSummary {
    fn from_side(side: Option<&FeedSide>) -> Self {
        let team = side.and_then(FeedSide::team).cloned().unwrap_or_default();
        Self {
            name: team.name.unwrap_or_default(),
            college: team.college_name.unwrap_or_default(),
            logo: team.college_logo.unwrap_or_default(),
            rank: side.and_then(FeedSide::rank),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub id: Option<String>,
    pub title: String,
    pub match_type: String,
    pub status: Option<String>,
    pub result: Option<String>,
    pub plan_game_count: i64,
    /// exactly as the feed has it
    pub start_time: Option<String>,
    pub red: SideSummary,
    pub red_score: i64,
    pub red_win_count: i64,
    pub blue: SideSummary,
    pub blue_score: i64,
    pub blue_win_count: i64,
    pub is_red: bool,
    pub is_win: Option<bool>,
    pub formatted_time: String,
    pub day_number: String,
    pub replay_url: String,
}

impl ScheduleEntry {
    fn new(m: &FeedMatch, side: Side, event_title: &str, replays: &ReplayLinks, tz: Tz) -> Self {
        let start = m.plan_started_at.as_deref();
        let time = localize(start, tz);
        let replay_url = replays.url_for(m.id.as_deref());
        if replay_url == NO_REPLAY_URL {
            debug!("No replay for match {:?}", m.id);
        }
        Self {
            id: m.id.clone(),
            title: match_title(event_title, start),
            match_type: m
                .match_type
                .clone()
                .unwrap_or_else(|| DEFAULT_MATCH_TYPE.to_string()),
            status: m.status.clone(),
            result: m.result.clone(),
            plan_game_count: m.plan_game_count.unwrap_or(DEFAULT_GAME_COUNT),
            start_time: m.plan_started_at.clone(),
            red: SideSummary::from_side(m.side(Side::Red)),
            red_score: m.red_side_score.unwrap_or(0),
            red_win_count: m.red_side_win_game_count.unwrap_or(0),
            blue: SideSummary::from_side(m.side(Side::Blue)),
            blue_score: m.blue_side_score.unwrap_or(0),
            blue_win_count: m.blue_side_win_game_count.unwrap_or(0),
            is_red: side == Side::Red,
            is_win: side.is_win(m.result.as_deref()),
            formatted_time: time.formatted,
            day_number: time.day,
            replay_url,
        }
    }

    fn sort_key(&self) -> &str {
        self.start_time.as_deref().unwrap_or("")
    }
}

/// every match `school` plays in, latest first
pub fn schedule_for_school(
    school: &str,
    feed: &ScheduleFeed,
    replays: &ReplayLinks,
    tz: Tz,
) -> Vec<ScheduleEntry> {
    let title = feed.title();
    let mut entries = feed
        .matches()
        .filter_map(|m| {
            m.side_of(school)
                .map(|side| ScheduleEntry::new(m, side, title, replays, tz))
        })
        .collect::<Vec<_>>();
    // string order is time order for this format; stable, so ties keep feed order
    entries.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
    debug!("Found {} matches for {school}", entries.len());
    entries
}

pub fn team_schedule(
    team: &Team,
    feed: &ScheduleFeed,
    replays: &ReplayLinks,
    tz: Tz,
) -> Vec<ScheduleEntry> {
    schedule_for_school(&team.school, feed, replays, tz)
}

#[cfg(test)]
mod tests {
    use super::{localize, match_title, schedule_for_school, Division, ScheduleFeed, Side};
    use crate::feeds::parse_document;
    use crate::feeds::replays::{ReplayFeed, ReplayLinks};
    use serde_json::json;

    const SHANGHAI: chrono_tz::Tz = chrono_tz::Asia::Shanghai;

    fn side(college: &str, rank: i64) -> serde_json::Value {
        json!({"player": {"rank": rank, "team": {"name": format!("{college}战队"), "collegeName": college, "collegeLogo": "logo.png"}}})
    }

    fn feed() -> ScheduleFeed {
        parse_document(
            &json!({"data": {"event": {"title": "RMUC 2025", "zones": {"nodes": [
                {
                    "groupMatches": {"nodes": [
                        {"id": 1, "planStartedAt": "2025-05-21T06:20:00Z", "result": "RED",
                         "redSide": side("A大学", 1), "blueSide": side("B大学", 2), "redSideScore": 2},
                        {"id": 2, "planStartedAt": "2025-05-22T06:20:00Z", "result": "RED",
                         "redSide": side("C大学", 3), "blueSide": side("A大学", 1)},
                        {"id": 3, "planStartedAt": "2025-05-23T06:20:00Z",
                         "redSide": side("B大学", 2), "blueSide": side("C大学", 3)}
                    ]},
                    "knockoutMatches": null
                },
                {
                    "groupMatches": {"nodes": "broken"},
                    "knockoutMatches": {"nodes": [
                        {"id": "4", "planStartedAt": "2025-08-10T01:00:00Z", "result": "BLUE",
                         "matchType": "KNOCKOUT", "planGameCount": 5,
                         "redSide": side("D大学", 4), "blueSide": side("A大学", 1)},
                        {"id": 5, "redSide": {"player": null}, "blueSide": side("A大学", 1)}
                    ]}
                }
            ]}}}})
            .to_string(),
        )
    }

    fn replays() -> ReplayLinks {
        let feed: ReplayFeed = parse_document(
            r#"{"simple_cms": [{"is_active": true, "content": {"match_id": "1", "main_remote_url": "https://v/1"}}]}"#,
        );
        ReplayLinks::from_feed(&feed)
    }

    #[test]
    fn test_relevance_and_perspective() {
        let entries = schedule_for_school("A大学", &feed(), &replays(), SHANGHAI);
        let ids = entries
            .iter()
            .map(|e| e.id.clone().unwrap_or_default())
            .collect::<Vec<_>>();
        // latest first, the match with no time last
        assert_eq!(vec!["4", "2", "1", "5"], ids);

        let knockout = &entries[0];
        assert!(!knockout.is_red);
        assert_eq!(Some(true), knockout.is_win);
        assert_eq!("KNOCKOUT", knockout.match_type);
        assert_eq!(5, knockout.plan_game_count);
        assert_eq!("RMUC 2025 - 全国总决赛与复活赛", knockout.title);

        let lost = &entries[1];
        assert!(!lost.is_red);
        assert_eq!(Some(false), lost.is_win);

        let won = &entries[2];
        assert!(won.is_red);
        assert_eq!(Some(true), won.is_win);
        assert_eq!("RMUC 2025 - 分区赛", won.title);
        assert_eq!("GROUP", won.match_type);
        assert_eq!(3, won.plan_game_count);
        assert_eq!(2, won.red_score);
        assert_eq!(0, won.blue_score);
        assert_eq!("B大学", won.blue.college);
        assert_eq!(Some(2), won.blue.rank);
        assert_eq!("https://v/1", won.replay_url);
        assert_eq!("2025-05-21 14:20", won.formatted_time);
        assert_eq!("21", won.day_number);

        let untimed = &entries[3];
        assert_eq!("RMUC 2025", untimed.title);
        assert_eq!("", untimed.formatted_time);
        assert_eq!("?", untimed.day_number);
        assert_eq!("", untimed.red.college);
        assert_eq!(None, untimed.red.rank);
        assert_eq!(None, untimed.is_win);
        assert_eq!("#", untimed.replay_url);
    }

    #[test]
    fn test_unknown_school() {
        assert!(schedule_for_school("Z大学", &feed(), &replays(), SHANGHAI).is_empty());
        // school matching is exact
        assert!(schedule_for_school("A大", &feed(), &replays(), SHANGHAI).is_empty());
    }

    #[test]
    fn test_empty_feeds() {
        for raw in ["{}", r#"{"data": null}"#, r#"{"data": {"event": {"zones": null}}}"#, "[]"] {
            let f: ScheduleFeed = parse_document(raw);
            assert!(schedule_for_school("A大学", &f, &ReplayLinks::default(), SHANGHAI).is_empty());
            assert_eq!("未知赛事", f.title());
        }
    }

    #[test]
    fn test_division() {
        assert_eq!(Division::RegionalPhase, Division::from_month(3));
        assert_eq!(Division::RegionalPhase, Division::from_month(6));
        assert_eq!(Division::NationalFinals, Division::from_month(7));
        assert_eq!("E - 分区赛", match_title("E", Some("2025-03-01T00:00:00Z")));
        assert_eq!("E - 全国总决赛与复活赛", match_title("E", Some("2025-09-01T00:00:00Z")));
        assert_eq!("E", match_title("E", Some("soon")));
        assert_eq!("E", match_title("E", None));
    }

    #[test]
    fn test_localize() {
        let t = localize(Some("2025-05-21T06:20:00Z"), SHANGHAI);
        assert_eq!("2025-05-21 14:20", t.formatted);
        assert_eq!("21", t.day);
        // crosses midnight
        let t = localize(Some("2025-05-21T18:30:00Z"), SHANGHAI);
        assert_eq!("2025-05-22 02:30", t.formatted);
        assert_eq!("22", t.day);
        let t = localize(Some("garbage"), SHANGHAI);
        assert_eq!("garbage", t.formatted);
        assert_eq!("?", t.day);
    }

    #[test]
    fn test_side_results() {
        assert_eq!(Some(true), Side::Red.is_win(Some("RED")));
        assert_eq!(Some(false), Side::Red.is_win(Some("BLUE")));
        assert_eq!(Some(true), Side::Blue.is_win(Some("BLUE")));
        assert_eq!(None, Side::Blue.is_win(Some("DRAW")));
        assert_eq!(None, Side::Blue.is_win(None));
    }
}
