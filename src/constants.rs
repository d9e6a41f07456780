pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DATA_DIR_VAR: &str = "DATA_DIR";
pub const LOGO_DIR_VAR: &str = "LOGO_DIR";
pub const FEED_BASE_URL_VAR: &str = "FEED_BASE_URL";
pub const FEED_REFRESH_SECS_VAR: &str = "FEED_REFRESH_SECS";
pub const LOGO_REFRESH_SECS_VAR: &str = "LOGO_REFRESH_SECS";
pub const FEED_TIMEOUT_SECS_VAR: &str = "FEED_TIMEOUT_SECS";
pub const DISPLAY_TIMEZONE_VAR: &str = "DISPLAY_TIMEZONE";
pub const TACTICAL_SCHEMA_FILE_VAR: &str = "TACTICAL_SCHEMA_FILE";
pub const CLEAR_OMITTED_TACTICS_VAR: &str = "CLEAR_OMITTED_TACTICS";
pub const LOG4RS_CONF_FILE_VAR: &str = "LOG4RS_CONFIG_FILE";

pub const DEFAULT_FEED_BASE_URL: &str = "https://rm-static.djicdn.com/live_json/";
pub const DEFAULT_DATA_DIR: &str = "static/data";
pub const DEFAULT_LOGO_DIR: &str = "static/logos";
pub const DEFAULT_LOG4RS_CONF_FILE: &str = "log4rs.yml";

pub const DEFAULT_GROUP: &str = "A";

/// shown instead of a replay link when the match has none
pub const NO_REPLAY_URL: &str = "#";
/// shown instead of a day number when the match time couldn't be parsed
pub const UNKNOWN_DAY: &str = "?";

pub const UNKNOWN_EVENT_TITLE: &str = "未知赛事";
pub const UNKNOWN_ZONE_NAME: &str = "未知赛区";
pub const UNKNOWN_GROUP_NAME: &str = "未知小组";
pub const UNKNOWN_COLLEGE_NAME: &str = "未知学校";
pub const UNKNOWN_TEAM_NAME: &str = "未知战队";
