//! Service health aggregation engine.
//!
//! A pure, stateless pipeline invoked once per query: normalize the
//! query, filter the event set, group by service, derive statistics and
//! error breakdowns, then rank and limit. No component holds state
//! across invocations, and a fixed evaluation instant yields
//! bit-identical output for the same event set.

pub mod breakdown;
pub mod group;
pub mod query;
pub mod rank;
pub mod stats;

use chrono::{DateTime, Utc};

use crate::models::{AggregationQuery, ErrorMetrics, MetricEvent, ServiceAggregation};

pub use query::{ResolvedQuery, DEFAULT_WINDOW_SECS};

/// Run the full aggregation pipeline over `events` as of `now`.
///
/// Returns one ranked summary per service with at least one matching
/// event; an empty slice of matches yields an empty list, not an error.
pub fn aggregate(
    events: &[MetricEvent],
    query: &AggregationQuery,
    now: DateTime<Utc>,
) -> Vec<ServiceAggregation> {
    let resolved = ResolvedQuery::resolve(query, now);

    let groups = group::group_events(events.iter().filter(|e| resolved.matches(e)));

    let summaries = groups
        .iter()
        .map(|acc| {
            let (rate, error_rate, duration, saturation) =
                stats::derive(acc, resolved.window_seconds);

            ServiceAggregation {
                service_name: acc.service_name.clone(),
                rank: 0, // assigned by the ranking stage
                rate,
                error: ErrorMetrics {
                    error_rate,
                    error_count: acc.error_count,
                    by_status_code: breakdown::status_breakdown(
                        &acc.errors_by_status,
                        acc.error_count,
                    ),
                    by_severity: breakdown::severity_breakdown(
                        &acc.errors_by_severity,
                        acc.error_count,
                    ),
                },
                duration,
                saturation,
            }
        })
        .collect();

    rank::rank_and_limit(summaries, query.rank_by, query.limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RankBy, Severity, TimeRange};
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap()
    }

    fn make_event(
        service: &str,
        status: u16,
        latency: f64,
        at: DateTime<Utc>,
    ) -> MetricEvent {
        MetricEvent {
            id: Uuid::new_v4(),
            service_name: service.to_string(),
            severity: if status >= 500 {
                Severity::Critical
            } else {
                Severity::Low
            },
            timestamp: at,
            response_time_ms: latency,
            status_code: status,
            request_count: 1,
            cpu_usage_pct: None,
            mem_usage_pct: None,
        }
    }

    /// Worked example: three events, one error, 1s window.
    #[test]
    fn test_single_service_summary() {
        let now = fixed_now();
        let at = now - Duration::milliseconds(500);
        let events = vec![
            make_event("a", 200, 10.0, at),
            make_event("a", 500, 20.0, at),
            make_event("a", 200, 30.0, at),
        ];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Custom),
            start_time: Some(now - Duration::seconds(1)),
            end_time: Some(now),
            ..Default::default()
        };

        let result = aggregate(&events, &query, now);
        assert_eq!(result.len(), 1);

        let a = &result[0];
        assert_eq!(a.rank, 1);
        assert_eq!(a.rate.total_requests, 3);
        assert_eq!(a.rate.requests_per_second, 3.0);
        assert_eq!(a.rate.requests_per_minute, 180.0);
        assert_eq!(a.error.error_count, 1);
        assert_eq!(a.error.error_rate, 33.33);
        assert_eq!(a.duration.average_response_time, 20.0);
        assert_eq!(a.duration.median_response_time, 20.0);
        assert_eq!(a.duration.p95_response_time, 30.0);
        assert_eq!(a.duration.min_response_time, 10.0);
        assert_eq!(a.duration.max_response_time, 30.0);

        assert_eq!(a.error.by_status_code.len(), 1);
        assert_eq!(a.error.by_status_code[0].status_code, 500);
        assert_eq!(a.error.by_status_code[0].percentage, 100.0);
        assert_eq!(a.error.by_severity[0].severity, Severity::Critical);
    }

    #[test]
    fn test_ranked_by_default_error_criterion() {
        let now = fixed_now();
        let at = now - Duration::seconds(60);
        let events = vec![
            make_event("healthy", 200, 5.0, at),
            make_event("healthy", 200, 5.0, at),
            make_event("flaky", 500, 5.0, at),
            make_event("flaky", 200, 5.0, at),
        ];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last1h),
            ..Default::default()
        };

        let result = aggregate(&events, &query, now);
        assert_eq!(result[0].service_name, "flaky");
        assert_eq!(result[0].error.error_rate, 50.0);
        assert_eq!(result[1].service_name, "healthy");
        assert_eq!(result[1].error.error_rate, 0.0);
    }

    #[test]
    fn test_window_excludes_old_events() {
        let now = fixed_now();
        let events = vec![
            make_event("a", 200, 5.0, now - Duration::seconds(60)),
            make_event("a", 200, 5.0, now - Duration::seconds(600)),
        ];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last5m),
            ..Default::default()
        };

        let result = aggregate(&events, &query, now);
        assert_eq!(result[0].rate.total_requests, 1);
    }

    #[test]
    fn test_filtered_out_services_never_appear() {
        let now = fixed_now();
        let at = now - Duration::seconds(10);
        let events = vec![
            make_event("keep", 200, 5.0, at),
            make_event("drop", 200, 5.0, at),
        ];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last5m),
            service_names: Some(vec!["keep".to_string()]),
            ..Default::default()
        };

        let result = aggregate(&events, &query, now);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].service_name, "keep");
    }

    #[test]
    fn test_empty_match_yields_empty_list() {
        let now = fixed_now();
        let events = vec![make_event("a", 200, 5.0, now - Duration::days(30))];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last5m),
            ..Default::default()
        };
        assert!(aggregate(&events, &query, now).is_empty());
    }

    #[test]
    fn test_limit_caps_output() {
        let now = fixed_now();
        let at = now - Duration::seconds(10);
        let events = vec![
            make_event("a", 200, 5.0, at),
            make_event("b", 200, 5.0, at),
            make_event("c", 200, 5.0, at),
        ];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last5m),
            rank_by: RankBy::Rate,
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(aggregate(&events, &query, now).len(), 2);
    }

    #[test]
    fn test_zero_request_count_never_poisons_error_rate() {
        let now = fixed_now();
        let mut event = make_event("a", 500, 20.0, now - Duration::seconds(30));
        event.request_count = 0;
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last5m),
            ..Default::default()
        };

        let result = aggregate(&[event], &query, now);
        assert_eq!(result.len(), 1);

        let rate = result[0].error.error_rate;
        assert!(rate.is_finite());
        assert!((0.0..=100.0).contains(&rate));
        assert_eq!(rate, 100.0);
        assert_eq!(result[0].rate.total_requests, 1);
    }

    #[test]
    fn test_idempotent_for_fixed_now() {
        let now = fixed_now();
        let at = now - Duration::seconds(30);
        let events = vec![
            make_event("b", 503, 12.0, at),
            make_event("a", 200, 7.0, at),
            make_event("c", 404, 90.0, at),
            make_event("a", 500, 44.0, at),
        ];
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last10m),
            ..Default::default()
        };

        let first = aggregate(&events, &query, now);
        let second = aggregate(&events, &query, now);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
