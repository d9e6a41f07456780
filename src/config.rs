use crate::constants::*;
use crate::tactics::{SchemaError, TacticalSchema};
use crate::team_edit::OmissionPolicy;
use crate::utils::{env_default, env_var};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::new_from_env());

pub struct Config {
    pub database_url: String,

    /// where feed snapshots are written to and read from
    pub data_dir: PathBuf,
    pub logo_dir: PathBuf,

    pub feed_base_url: String,
    pub feed_refresh_secs: u64,
    pub logo_refresh_secs: u64,
    pub feed_timeout_secs: u64,

    pub display_timezone: Tz,

    pub tactical_schema_file: Option<PathBuf>,
    pub omission_policy: OmissionPolicy,

    pub log4rs_config_file: String,
}

impl Config {
    fn new_from_env() -> Self {
        let clear_omitted: bool = env_default(CLEAR_OMITTED_TACTICS_VAR, false);
        Self {
            database_url: env_var(DATABASE_URL_VAR),
            data_dir: env_default(DATA_DIR_VAR, PathBuf::from(DEFAULT_DATA_DIR)),
            logo_dir: env_default(LOGO_DIR_VAR, PathBuf::from(DEFAULT_LOGO_DIR)),
            feed_base_url: env_default(FEED_BASE_URL_VAR, DEFAULT_FEED_BASE_URL.to_string()),
            feed_refresh_secs: env_default(FEED_REFRESH_SECS_VAR, 600),
            logo_refresh_secs: env_default(LOGO_REFRESH_SECS_VAR, 86400),
            feed_timeout_secs: env_default(FEED_TIMEOUT_SECS_VAR, 10),
            display_timezone: env_default(DISPLAY_TIMEZONE_VAR, chrono_tz::Asia::Shanghai),
            tactical_schema_file: std::env::var(TACTICAL_SCHEMA_FILE_VAR)
                .ok()
                .map(PathBuf::from),
            omission_policy: if clear_omitted {
                OmissionPolicy::Clear
            } else {
                OmissionPolicy::Keep
            },
            log4rs_config_file: env_default(
                LOG4RS_CONF_FILE_VAR,
                DEFAULT_LOG4RS_CONF_FILE.to_string(),
            ),
        }
    }

    /// the configured schema file if there is one, the built-in checklist otherwise
    pub fn tactical_schema(&self) -> Result<TacticalSchema, SchemaError> {
        match &self.tactical_schema_file {
            Some(path) => TacticalSchema::from_json_file(path),
            None => Ok(TacticalSchema::default()),
        }
    }
}
