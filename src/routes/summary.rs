//! Service health summary API endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregation::{self, ResolvedQuery};
use crate::error::Result;
use crate::models::{AggregationQuery, MetricEvent, ServiceAggregation};
use crate::state::AppState;

/// Response for the health summary endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummaryResponse {
    /// Evaluation instant ("now") the window was resolved against
    pub generated_at: DateTime<Utc>,
    /// Resolved window length used as the rate denominator
    pub window_seconds: i64,
    pub count: usize,
    /// Ranked per-service summaries, best-to-worst by the criterion
    pub services: Vec<ServiceAggregation>,
}

/// POST /api/v1/services/health
///
/// Accepts an aggregation query and returns ranked per-service health
/// summaries over the resolved window.
///
/// Unusable time bounds fall back to "no time filter, 24h nominal
/// window" rather than failing; an empty match yields an empty list.
/// Event-store failures abort the whole call, there is no partial
/// result.
pub async fn service_health(
    State(state): State<AppState>,
    Json(query): Json<AggregationQuery>,
) -> Result<Json<HealthSummaryResponse>> {
    let now = Utc::now();
    let resolved = ResolvedQuery::resolve(&query, now);

    // The store narrows by time only; the engine applies the full
    // predicate and does the grouping, statistics, and ranking.
    let events = state.db.fetch_events(resolved.window).await?;
    let services = aggregation::aggregate(&events, &query, now);

    info!(
        events = events.len(),
        services = services.len(),
        window_seconds = resolved.window_seconds,
        rank_by = ?query.rank_by,
        "Health summary computed"
    );

    Ok(Json(HealthSummaryResponse {
        generated_at: now,
        window_seconds: resolved.window_seconds,
        count: services.len(),
        services,
    }))
}

/// GET /api/v1/events/recent
///
/// Returns the most recent raw events.
pub async fn get_recent_events(
    State(state): State<AppState>,
    Query(params): Query<RecentEventsQuery>,
) -> Result<Json<RecentEventsResponse>> {
    let limit = params.limit.unwrap_or(100).min(1000);

    let events = state.db.get_recent_events(limit).await?;

    Ok(Json(RecentEventsResponse {
        count: events.len(),
        events,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentEventsQuery {
    /// Maximum number of events to return (default: 100, max: 1000)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentEventsResponse {
    pub count: usize,
    pub events: Vec<MetricEvent>,
}
