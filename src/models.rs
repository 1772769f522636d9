//! Core domain models for ServicePulse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity label attached to a telemetry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A single telemetry event, one per observed request or coalesced batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEvent {
    /// Unique identifier, generated at ingestion when the client omits it
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Name of the emitting service
    pub service_name: String,
    /// Severity label
    pub severity: Severity,
    /// Instant the event occurred
    pub timestamp: DateTime<Utc>,
    /// Response latency in milliseconds
    pub response_time_ms: f64,
    /// HTTP-style status code; values >= 400 are classified as errors
    pub status_code: u16,
    /// Number of identical requests this event represents (coalesced
    /// batch); must be >= 1, defaults to 1
    #[serde(
        default = "default_request_count",
        deserialize_with = "deserialize_request_count"
    )]
    pub request_count: u64,
    /// CPU usage gauge, 0-100
    pub cpu_usage_pct: Option<f64>,
    /// Memory usage gauge, 0-100
    pub mem_usage_pct: Option<f64>,
}

fn default_request_count() -> u64 {
    1
}

/// Reject an explicit `requestCount: 0` at the wire boundary; a zero
/// count would make a group's rate and error divisors zero downstream.
fn deserialize_request_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let count = u64::deserialize(deserializer)?;
    if count == 0 {
        return Err(serde::de::Error::custom("requestCount must be >= 1"));
    }
    Ok(count)
}

impl MetricEvent {
    /// True when this event represents failed requests
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// Relative time window selector for aggregation queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "5m")]
    Last5m,
    #[serde(rename = "10m")]
    Last10m,
    #[serde(rename = "1h")]
    Last1h,
    #[serde(rename = "24h")]
    Last24h,
    #[serde(rename = "7d")]
    Last7d,
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRange {
    /// Fixed window duration in seconds for the named ranges.
    /// `Custom` has no fixed duration; its bounds come from the query.
    pub fn duration_secs(self) -> Option<i64> {
        match self {
            TimeRange::Last5m => Some(300),
            TimeRange::Last10m => Some(600),
            TimeRange::Last1h => Some(3600),
            TimeRange::Last24h => Some(86_400),
            TimeRange::Last7d => Some(604_800),
            TimeRange::Custom => None,
        }
    }
}

/// Criterion used to order the per-service summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    Rate,
    #[default]
    Error,
    Duration,
    Saturation,
}

/// A loosely-specified aggregation request, normalized by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationQuery {
    /// Named window ending "now", or `custom` with explicit bounds
    pub time_range: Option<TimeRange>,
    /// Explicit window start (used with `custom` or absent `time_range`)
    pub start_time: Option<DateTime<Utc>>,
    /// Explicit window end
    pub end_time: Option<DateTime<Utc>>,
    /// Allow-list of service names; absent or empty = no filter
    pub service_names: Option<Vec<String>>,
    /// Allow-list of severities; absent or empty = no filter
    pub severities: Option<Vec<Severity>>,
    /// Ranking criterion, defaults to error rate
    #[serde(default)]
    pub rank_by: RankBy,
    /// Cap on the number of returned services
    pub limit: Option<usize>,
}

/// Derived resource-pressure band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Request-rate figures for one service over the query window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateMetrics {
    pub requests_per_second: f64,
    pub requests_per_minute: f64,
    pub total_requests: u64,
}

/// One entry of an error breakdown, keyed by status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdownEntry {
    pub status_code: u16,
    pub count: u64,
    /// Share of this service's errors, not of its total requests
    pub percentage: f64,
}

/// One entry of an error breakdown, keyed by severity label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBreakdownEntry {
    pub severity: Severity,
    pub count: u64,
    /// Share of this service's errors, not of its total requests
    pub percentage: f64,
}

/// Error composition for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMetrics {
    /// Percentage of total requests with status >= 400
    pub error_rate: f64,
    pub error_count: u64,
    /// Sorted by descending count
    pub by_status_code: Vec<StatusBreakdownEntry>,
    /// Sorted by descending count
    pub by_severity: Vec<SeverityBreakdownEntry>,
}

/// Latency distribution for one service, same unit as the input events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationMetrics {
    pub average_response_time: f64,
    pub median_response_time: f64,
    pub p95_response_time: f64,
    pub p99_response_time: f64,
    pub min_response_time: f64,
    pub max_response_time: f64,
}

/// Resource saturation summary for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaturationMetrics {
    pub average_cpu_usage: f64,
    pub max_cpu_usage: f64,
    pub average_memory_usage: f64,
    pub max_memory_usage: f64,
    pub resource_utilization: ResourceLevel,
}

/// Ranked health summary for one service, freshly computed per query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAggregation {
    pub service_name: String,
    /// 1-based dense rank, assigned after sorting
    pub rank: usize,
    pub rate: RateMetrics,
    pub error: ErrorMetrics,
    pub duration: DurationMetrics,
    pub saturation: SaturationMetrics,
}

/// Request payload for ingesting telemetry events
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub events: Vec<MetricEvent>,
}

/// Response payload for ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    /// Number of events accepted into the buffer
    pub ingested: usize,
    /// Number of events dropped (buffer full)
    pub dropped: usize,
}
