//! Flush task - moves buffered events to the event store

use crate::buffer::EventBuffer;
use crate::db::EventStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Background task that periodically flushes events from the buffer to
/// the event store.
///
/// Runs every 5 seconds, pulls a batch from the buffer, and batch-inserts
/// into Postgres. Aggregation itself happens at query time, over the
/// stored raw events.
pub async fn flush_task(buffer: EventBuffer, db: Arc<EventStore>) {
    let mut interval = tokio::time::interval(Duration::from_secs(5));

    info!("Flush task started (5s interval)");

    loop {
        interval.tick().await;

        // Pop batch from buffer
        let batch = buffer.pop_batch(10_000);
        if batch.is_empty() {
            continue;
        }

        let batch_size = batch.len();
        debug!(batch_size = batch_size, "Flushing event batch to store");

        // Insert batch into the store
        match db.insert_events_batch(&batch).await {
            Ok(inserted) => {
                if inserted < batch_size {
                    error!(
                        inserted = inserted,
                        expected = batch_size,
                        "Some events failed to insert"
                    );
                } else {
                    debug!(inserted = inserted, "Event batch inserted successfully");
                }
            }
            Err(e) => {
                error!(error = %e, batch_size = batch_size, "Failed to insert event batch");
                // Note: events are lost if insert fails
                // In production, consider retry logic or dead-letter queue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricEvent, Severity};
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_event() -> MetricEvent {
        MetricEvent {
            id: Uuid::new_v4(),
            service_name: "checkout".to_string(),
            severity: Severity::Low,
            timestamp: Utc::now(),
            response_time_ms: 10.0,
            status_code: 200,
            request_count: 1,
            cpu_usage_pct: None,
            mem_usage_pct: None,
        }
    }

    #[test]
    fn test_pop_batch() {
        let buffer = EventBuffer::new(1000);

        for _ in 0..100 {
            buffer.try_push(create_test_event()).unwrap();
        }

        let batch = buffer.pop_batch(50);
        assert_eq!(batch.len(), 50);
        assert_eq!(buffer.len(), 50);
    }
}
