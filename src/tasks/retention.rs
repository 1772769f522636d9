//! Retention task - prunes old raw events

use crate::db::EventStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Background task that periodically prunes old events.
///
/// Runs every 6 hours and deletes raw events older than 30 days.
pub async fn retention_task(db: Arc<EventStore>) {
    // Wait 1 minute before starting to allow system to stabilize
    tokio::time::sleep(Duration::from_secs(60)).await;

    let mut interval = tokio::time::interval(Duration::from_secs(6 * 60 * 60)); // 6 hours

    info!("Retention task started (6h interval)");

    loop {
        interval.tick().await;

        info!("Running retention cleanup...");

        match db.prune_old_events(30).await {
            Ok(deleted) => {
                if deleted > 0 {
                    info!(deleted = deleted, "Pruned old events");
                } else {
                    info!("No old events to prune");
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to prune old events");
            }
        }
    }
}
