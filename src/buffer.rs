//! Lock-free ring buffer for high-throughput event ingestion

use crate::models::MetricEvent;
use crossbeam::queue::ArrayQueue;
use std::sync::Arc;

/// A lock-free event buffer backed by crossbeam's ArrayQueue.
///
/// Ingestion handlers push events here; the flush task drains batches
/// into the event store, keeping request handling off the database path.
#[derive(Clone)]
pub struct EventBuffer {
    queue: Arc<ArrayQueue<MetricEvent>>,
    capacity: usize,
}

impl EventBuffer {
    /// Create a new buffer with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Arc::new(ArrayQueue::new(capacity)),
            capacity,
        }
    }

    /// Try to push an event into the buffer.
    ///
    /// Returns `Ok(())` if successful, or `Err(event)` if the buffer is full.
    pub fn try_push(&self, event: MetricEvent) -> Result<(), MetricEvent> {
        self.queue.push(event)
    }

    /// Pop a batch of events from the buffer.
    ///
    /// Returns up to `max` events, or fewer if the buffer has less.
    pub fn pop_batch(&self, max: usize) -> Vec<MetricEvent> {
        let mut batch = Vec::with_capacity(max.min(self.queue.len()));
        for _ in 0..max {
            match self.queue.pop() {
                Some(event) => batch.push(event),
                None => break,
            }
        }
        batch
    }

    /// Get the current number of events in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
