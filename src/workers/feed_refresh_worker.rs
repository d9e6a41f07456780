use crate::workers::{tick_duration, Shutdown};
use log::info;
use rmintel::config::CONFIG;
use rmintel::feeds::fetch::{refresh_snapshots, FeedSource};
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;

pub async fn cron<S: FeedSource + Send + Sync + ?Sized>(mut sd: Receiver<Shutdown>, source: Arc<S>) {
    let tick_duration = tick_duration(CONFIG.feed_refresh_secs);
    info!(
        "Starting feed refresh worker: running every {} seconds",
        tick_duration.as_secs()
    );
    let mut intv = tokio::time::interval(tick_duration);
    loop {
        tokio::select! {
            _ = intv.tick() => {
                refresh_snapshots(source.as_ref(), &CONFIG.feed_base_url, &CONFIG.data_dir).await;
            }
            _sd = sd.recv() => {
                info!("feed refresh worker shutting down");
                break;
            }
        }
    }
}
