use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use uuid::Uuid;

pub mod place;

pub use place::{GeoPoint, InfluencerRef, ListEntry, MapMarker, Place, Recommendation};

/// Kind of analytics event a visitor action produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    DirectionClick,
    VideoClick,
    MarkerClick,
    ListView,
    MapView,
}

impl EventKind {
    /// Wire name of the kind, identical to its serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::PageView => "page_view",
            EventKind::DirectionClick => "direction_click",
            EventKind::VideoClick => "video_click",
            EventKind::MarkerClick => "marker_click",
            EventKind::ListView => "list_view",
            EventKind::MapView => "map_view",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client-side event before it is gated, deduplicated, and enveloped
///
/// The optional ids correlate the event with catalog records; `metadata`
/// carries free-form key-value context and is serialized to a JSON string
/// before transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub kind: EventKind,
    pub place_id: Option<String>,
    pub influencer_id: Option<String>,
    pub recommendation_id: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl TrackedEvent {
    /// Creates an event of the given kind with no correlation ids
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            place_id: None,
            influencer_id: None,
            recommendation_id: None,
            metadata: None,
        }
    }

    /// A directions click on a place card or marker info window
    pub fn direction_click(place_id: impl Into<String>) -> Self {
        Self {
            place_id: Some(place_id.into()),
            ..Self::new(EventKind::DirectionClick)
        }
    }

    /// A click on a recommendation's video link
    pub fn video_click(place_id: impl Into<String>, recommendation_id: impl Into<String>) -> Self {
        Self {
            place_id: Some(place_id.into()),
            recommendation_id: Some(recommendation_id.into()),
            ..Self::new(EventKind::VideoClick)
        }
    }

    /// A tap on a map marker
    pub fn marker_click(place_id: impl Into<String>) -> Self {
        Self {
            place_id: Some(place_id.into()),
            ..Self::new(EventKind::MarkerClick)
        }
    }

    /// Deduplication key: kind plus correlation ids, absent ids rendered empty
    ///
    /// Two events with the same key inside the debounce window are the same
    /// interaction as far as suppression is concerned.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.kind,
            self.place_id.as_deref().unwrap_or(""),
            self.influencer_id.as_deref().unwrap_or(""),
            self.recommendation_id.as_deref().unwrap_or(""),
        )
    }
}

/// Wire form of a tracked event as POSTed to the collector
///
/// Field names are camelCase and `metadata` is the pre-serialized JSON string
/// of the metadata map, so the body matches what browser clients send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub place_id: Option<String>,
    pub influencer_id: Option<String>,
    pub recommendation_id: Option<String>,
    pub session_id: String,
    pub metadata: Option<String>,
}

impl EventEnvelope {
    /// Builds the envelope for an event attributed to a session
    ///
    /// Metadata that fails to serialize is dropped rather than aborting the
    /// event; tracking must not fail on the caller's behalf.
    pub fn from_event(event: TrackedEvent, session_id: String) -> Self {
        let metadata = event.metadata.and_then(|map| {
            match serde_json::to_string(&Value::Object(map)) {
                Ok(json) => Some(json),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize event metadata, dropping it");
                    None
                }
            }
        });

        Self {
            kind: event.kind,
            place_id: event.place_id,
            influencer_id: event.influencer_id,
            recommendation_id: event.recommendation_id,
            session_id,
            metadata,
        }
    }
}

/// An event as recorded by the collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub place_id: Option<String>,
    pub influencer_id: Option<String>,
    pub recommendation_id: Option<String>,
    pub session_id: String,
    pub metadata: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl StoredEvent {
    /// Stamps an incoming envelope with a fresh id and the receive time
    pub fn from_envelope(envelope: EventEnvelope) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: envelope.kind,
            place_id: envelope.place_id,
            influencer_id: envelope.influencer_id,
            recommendation_id: envelope.recommendation_id,
            session_id: envelope.session_id,
            metadata: envelope.metadata,
            received_at: Utc::now(),
        }
    }
}
