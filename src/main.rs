use log::{info, warn};
use rmintel::config::CONFIG;
use rmintel::db::{raw_diesel_cxn_from_env, run_migrations};
use rmintel::feeds::fetch::HttpFeedSource;
use rmintel::seed::{initialize, StoreInit};
use rmintel::RmIntelError;
use std::sync::Arc;
use std::time::Duration;
use workers::Shutdown;

mod workers;

fn init_logging() {
    if let Err(e) = log4rs::init_file(&CONFIG.log4rs_config_file, Default::default()) {
        // no logger yet, so this is all we can do
        eprintln!(
            "Unable to initialize logging from {}: {e}",
            CONFIG.log4rs_config_file
        );
    }
}

/// migrates the database, then either seeds it or brings it in line with the current checklist
fn prepare_store() -> Result<(), RmIntelError> {
    let schema = CONFIG.tactical_schema()?;
    let mut conn = raw_diesel_cxn_from_env()?;
    run_migrations(&mut conn).map_err(|e| RmIntelError::MigrationError(e.to_string()))?;
    match initialize(&schema, &mut conn)? {
        StoreInit::Seeded(n) => {
            info!("Empty database: added {n} predefined teams");
        }
        StoreInit::Reconciled {
            summary,
            groups_backfilled,
        } => {
            info!(
                "Existing database: {} tactical entries added, {} removed, {} groups backfilled",
                summary.total_added, summary.total_deleted, groups_backfilled
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv() {
        eprintln!("Not loading .env: {e}");
    }
    init_logging();
    prepare_store()?;

    let source = Arc::new(HttpFeedSource::new(Duration::from_secs(
        CONFIG.feed_timeout_secs,
    ))?);
    let (shutdown_send, _) = tokio::sync::broadcast::channel::<Shutdown>(1);
    tokio::spawn(workers::feed_refresh_worker::cron(
        shutdown_send.subscribe(),
        source.clone(),
    ));
    tokio::spawn(workers::logo_worker::cron(shutdown_send.subscribe(), source));

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Error waiting for ctrl-c: {e}");
    }
    let (shutdown_signal_send, mut shutdown_signal_recv) = tokio::sync::mpsc::channel(1);
    // send a copy of an mpsc sender to each watcher of the shutdown thread...
    {
        shutdown_send
            .send(Shutdown {
                _handle: shutdown_signal_send.clone(),
            })
            .ok();
    }

    drop(shutdown_signal_send);
    shutdown_signal_recv.recv().await;
    info!("Shutting down gracefully");
    Ok(())
}
