use crate::workers::{tick_duration, Shutdown};
use log::{info, warn};
use rmintel::config::CONFIG;
use rmintel::feeds::fetch::FeedSource;
use rmintel::feeds::logos::refresh_logos;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

pub async fn cron<S: FeedSource + Send + Sync + ?Sized>(mut sd: Receiver<Shutdown>, source: Arc<S>) {
    let tick_duration = tick_duration(CONFIG.logo_refresh_secs);
    // a logo is stale once it's older than one refresh period
    let max_age = Duration::from_secs(CONFIG.logo_refresh_secs);
    info!(
        "Starting logo worker: running every {} seconds",
        tick_duration.as_secs()
    );
    let mut intv = tokio::time::interval(tick_duration);
    loop {
        tokio::select! {
            _ = intv.tick() => {
                if let Err(e) = refresh_logos(source.as_ref(), &CONFIG.data_dir, &CONFIG.logo_dir, max_age).await {
                    warn!("Error refreshing logos: {e}");
                }
            }
            _sd = sd.recv() => {
                info!("logo worker shutting down");
                break;
            }
        }
    }
}
