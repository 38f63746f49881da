use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::models::{EventEnvelope, EventKind, TrackedEvent};
use crate::services::debounce::DebounceCache;
use crate::services::session::SessionProvider;
use crate::services::transport::EventTransport;

/// Window inside which a repeated event with the same dedup key is dropped
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(2000);

/// Entry count above which the debounce cache starts evicting
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Receives delivery failures the tracker itself swallows
///
/// Tracking is fire-and-forget, so a failed POST never surfaces to the
/// caller; it surfaces here instead.
pub trait DeliveryObserver: Send + Sync {
    fn delivery_failed(&self, envelope: &EventEnvelope, error: &AppError);
}

/// Default observer, logs failures at warn level
pub struct LogObserver;

impl DeliveryObserver for LogObserver {
    fn delivery_failed(&self, envelope: &EventEnvelope, error: &AppError) {
        tracing::warn!(
            kind = %envelope.kind,
            error = %error,
            "Event delivery failed"
        );
    }
}

/// Tuning knobs for a tracker instance
pub struct TrackerOptions {
    pub debounce_window: Duration,
    pub cache_capacity: usize,
    pub observer: Arc<dyn DeliveryObserver>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            observer: Arc::new(LogObserver),
        }
    }
}

/// What became of a single `track` call
///
/// Callers are free to ignore this; it exists so tests and diagnostics can
/// tell a dispatched event from a suppressed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Handed to the background dispatcher for delivery
    Dispatched,
    /// Same dedup key fired less than one window ago
    SuppressedDuplicate,
    /// No session id available; event not recorded anywhere
    MissingSession,
    /// The background dispatcher is no longer running
    DispatcherStopped,
}

/// A page impression to be tracked with its navigation context
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub url: String,
    pub referrer: Option<String>,
    pub influencer_id: Option<String>,
    pub place_id: Option<String>,
}

/// Client-side event pipeline: session gate, debounce, background delivery
///
/// `track` itself is synchronous and cheap; delivery happens on a spawned
/// task fed through an unbounded channel, mirroring how analytics beacons
/// must never block the interaction that produced them.
#[derive(Clone)]
pub struct Tracker {
    session: SessionProvider,
    cache: Arc<Mutex<DebounceCache>>,
    tx: mpsc::UnboundedSender<EventEnvelope>,
}

/// Owner handle for the dispatcher task behind a `Tracker`
///
/// Dropping the handle stops the dispatcher; call `shutdown` to have it
/// drain queued events first.
pub struct TrackerHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl TrackerHandle {
    /// Signals the dispatcher to deliver whatever is queued and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

impl Tracker {
    /// Creates a tracker and spawns its dispatcher onto the current runtime
    pub fn new(
        transport: Arc<dyn EventTransport>,
        session: SessionProvider,
        options: TrackerOptions,
    ) -> (Self, TrackerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let cache = Arc::new(Mutex::new(DebounceCache::new(
            options.debounce_window,
            options.cache_capacity,
        )));

        tokio::spawn(dispatch_task(transport, options.observer, rx, shutdown_rx));

        (Self { session, cache, tx }, TrackerHandle { shutdown_tx })
    }

    /// Runs one event through the pipeline: session gate, duplicate
    /// suppression, then hand-off to the background dispatcher
    pub fn track(&self, event: TrackedEvent) -> TrackOutcome {
        let session_id = self.session.session_id();
        if session_id.is_empty() {
            return TrackOutcome::MissingSession;
        }

        let key = event.dedup_key();
        let now = Instant::now();
        {
            let mut cache = match self.cache.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if cache.should_suppress(&key, now) {
                return TrackOutcome::SuppressedDuplicate;
            }
            cache.record(key, now);
        }

        let envelope = EventEnvelope::from_event(event, session_id);
        match self.tx.send(envelope) {
            Ok(()) => TrackOutcome::Dispatched,
            Err(_) => TrackOutcome::DispatcherStopped,
        }
    }

    /// Tracks a page impression, folding the navigation context into metadata
    pub fn track_page_view(&self, view: PageView) -> TrackOutcome {
        let mut metadata = Map::new();
        metadata.insert("url".to_string(), Value::String(view.url));
        metadata.insert(
            "referrer".to_string(),
            view.referrer.map(Value::String).unwrap_or(Value::Null),
        );

        let event = TrackedEvent {
            kind: EventKind::PageView,
            place_id: view.place_id,
            influencer_id: view.influencer_id,
            recommendation_id: None,
            metadata: Some(metadata),
        };
        self.track(event)
    }
}

async fn dispatch_task(
    transport: Arc<dyn EventTransport>,
    observer: Arc<dyn DeliveryObserver>,
    mut rx: mpsc::UnboundedReceiver<EventEnvelope>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::debug!(transport = transport.name(), "Event dispatcher started");

    loop {
        tokio::select! {
            Some(envelope) = rx.recv() => {
                deliver(transport.as_ref(), observer.as_ref(), envelope).await;
            }
            _ = shutdown_rx.recv() => {
                // Drain whatever queued up before the shutdown signal
                while let Ok(envelope) = rx.try_recv() {
                    deliver(transport.as_ref(), observer.as_ref(), envelope).await;
                }
                tracing::debug!("Event dispatcher shut down");
                break;
            }
            else => break,
        }
    }
}

async fn deliver(
    transport: &dyn EventTransport,
    observer: &dyn DeliveryObserver,
    envelope: EventEnvelope,
) {
    if let Err(error) = transport.deliver(&envelope).await {
        observer.delivery_failed(&envelope, &error);
    }
}
