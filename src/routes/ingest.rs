//! HTTP ingestion endpoint for high-throughput telemetry collection

use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{IngestRequest, IngestResponse};
use crate::state::AppState;

/// POST /api/v1/events/ingest
///
/// Ingests a batch of telemetry events into the buffer; the flush task
/// moves them to the event store.
///
/// Returns 202 Accepted with count of ingested events.
pub async fn ingest_events(
    State(state): State<AppState>,
    Json(payload): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>)> {
    let total = payload.events.len();
    let mut ingested = 0;
    let mut dropped = 0;

    for event in payload.events {
        match state.event_buffer.try_push(event) {
            Ok(()) => ingested += 1,
            Err(_dropped_event) => {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!(
            total = total,
            ingested = ingested,
            dropped = dropped,
            "Buffer full, some events dropped"
        );
    } else {
        info!(
            total = total,
            ingested = ingested,
            "Events ingested successfully"
        );
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse { ingested, dropped }),
    ))
}
