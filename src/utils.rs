use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// explodes if the var is missing. only call this for config that the program cannot run without
pub fn env_var(name: &str) -> String {
    match std::env::var(name) {
        Ok(v) => v,
        Err(_e) => {
            panic!("Missing required environment variable {name}");
        }
    }
}

/// returns `default` if the var is missing *or* if it fails to parse
pub fn env_default<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub fn epoch_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
