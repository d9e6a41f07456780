use std::time::Duration;

pub mod feed_refresh_worker;
pub mod logo_worker;

#[derive(Clone, Debug)]
/// Drop this struct to signal you are done shutting down
pub struct Shutdown {
    pub(crate) _handle: tokio::sync::mpsc::Sender<()>,
}

/// never tick faster than once a second, whatever the config says
fn tick_duration(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}
