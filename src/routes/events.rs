use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{EventEnvelope, EventKind, StoredEvent};
use crate::state::AppState;

/// Body of a track request
///
/// `type` and `sessionId` are required; the rest is optional context. An
/// unrecognized `type` value fails body deserialization outright, which axum
/// reports as an unprocessable entity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventRequest {
    #[serde(rename = "type")]
    pub kind: Option<EventKind>,
    pub place_id: Option<String>,
    pub influencer_id: Option<String>,
    pub recommendation_id: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrackEventResponse {
    pub success: bool,
}

/// Handler for event ingestion
pub async fn track(
    State(state): State<AppState>,
    Json(body): Json<TrackEventRequest>,
) -> AppResult<Json<TrackEventResponse>> {
    let kind = body
        .kind
        .ok_or_else(|| AppError::InvalidInput("Missing event type".to_string()))?;

    let session_id = match body.session_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(AppError::InvalidInput("Missing session id".to_string())),
    };

    let envelope = EventEnvelope {
        kind,
        place_id: body.place_id,
        influencer_id: body.influencer_id,
        recommendation_id: body.recommendation_id,
        session_id,
        metadata: body.metadata,
    };
    let event = StoredEvent::from_envelope(envelope);

    tracing::info!(
        kind = %event.kind,
        place_id = %event.place_id.as_deref().unwrap_or("-"),
        session_id = %event.session_id,
        "Event received"
    );

    state.sink.record(event).await?;

    Ok(Json(TrackEventResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Handler for the recent-events inspection endpoint
pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> AppResult<Json<Vec<StoredEvent>>> {
    let limit = params.limit.unwrap_or(10);
    let events = state.sink.recent(limit).await?;
    Ok(Json(events))
}
