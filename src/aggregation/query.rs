//! Query normalization: resolves a loosely-specified aggregation query
//! into a concrete event predicate and a rate-denominator window.

use chrono::{DateTime, Duration, Utc};

use crate::models::{AggregationQuery, MetricEvent, Severity, TimeRange};

/// Nominal window applied when a query carries no usable time bounds.
/// Used only as the rate denominator, never as a filter.
pub const DEFAULT_WINDOW_SECS: i64 = 86_400;

/// A fully resolved query: concrete window bounds (if any), filter
/// allow-lists, and the window length used for rate normalization.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    /// Inclusive start / exclusive end; `None` means no time filter
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Window length in seconds, floored at 1 (it is used as a divisor)
    pub window_seconds: i64,
    /// Service allow-list; `None` means no constraint
    pub service_names: Option<Vec<String>>,
    /// Severity allow-list; `None` means no constraint
    pub severities: Option<Vec<Severity>>,
}

impl ResolvedQuery {
    /// Resolve `query` against the evaluation instant `now`.
    ///
    /// Named ranges resolve to `[now - d, now)`. A `custom` (or absent)
    /// range with both explicit bounds uses them verbatim. Missing or
    /// partial custom bounds fall back to "no time filter, 24h nominal
    /// window" rather than failing.
    pub fn resolve(query: &AggregationQuery, now: DateTime<Utc>) -> Self {
        let (window, window_seconds) = match query.time_range {
            Some(range) if range != TimeRange::Custom => {
                // duration_secs is Some for every named range
                let secs = range.duration_secs().unwrap_or(DEFAULT_WINDOW_SECS);
                let start = now - Duration::seconds(secs);
                (Some((start, now)), secs)
            }
            _ => match (query.start_time, query.end_time) {
                (Some(start), Some(end)) => {
                    let secs = (end - start).num_seconds();
                    (Some((start, end)), secs)
                }
                _ => (None, DEFAULT_WINDOW_SECS),
            },
        };

        Self {
            window,
            window_seconds: window_seconds.max(1),
            service_names: non_empty(query.service_names.clone()),
            severities: non_empty(query.severities.clone()),
        }
    }

    /// Predicate applied to every candidate event:
    /// time window AND service allow-list AND severity allow-list.
    pub fn matches(&self, event: &MetricEvent) -> bool {
        if let Some((start, end)) = self.window {
            if event.timestamp < start || event.timestamp >= end {
                return false;
            }
        }
        if let Some(names) = &self.service_names {
            if !names.iter().any(|n| n == &event.service_name) {
                return false;
            }
        }
        if let Some(severities) = &self.severities {
            if !severities.contains(&event.severity) {
                return false;
            }
        }
        true
    }
}

/// Empty allow-lists impose no constraint, same as absent ones.
fn non_empty<T>(list: Option<Vec<T>>) -> Option<Vec<T>> {
    list.filter(|l| !l.is_empty())
}
