//! Application state shared across handlers

use crate::buffer::EventBuffer;
use crate::db::EventStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Event store connection pool
    pub db: Arc<EventStore>,
    /// Lock-free event buffer for high-throughput ingestion
    pub event_buffer: EventBuffer,
}

impl AppState {
    /// Create new application state
    ///
    /// # Arguments
    /// * `db` - Event store connection
    /// * `buffer_capacity` - Capacity of the ingestion buffer
    pub fn new(db: EventStore, buffer_capacity: usize) -> Self {
        Self {
            db: Arc::new(db),
            event_buffer: EventBuffer::new(buffer_capacity),
        }
    }
}
