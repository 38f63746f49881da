use std::sync::Arc;

use crate::services::sink::EventSink;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn EventSink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}
