use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::StoredEvent;

/// Destination for events the collector accepts
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn record(&self, event: StoredEvent) -> AppResult<()>;

    /// The most recently received events, newest first
    async fn recent(&self, limit: usize) -> AppResult<Vec<StoredEvent>>;
}

/// In-process ring buffer of received events
///
/// Holds the newest `capacity` events; older ones fall off the front. Good
/// enough for inspection endpoints and tests, not a durable store.
pub struct MemorySink {
    capacity: usize,
    events: RwLock<VecDeque<StoredEvent>>,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: RwLock::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn record(&self, event: StoredEvent) -> AppResult<()> {
        let mut events = self.events.write().await;
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AppResult<Vec<StoredEvent>> {
        let events = self.events.read().await;
        Ok(events.iter().rev().take(limit).cloned().collect())
    }
}
