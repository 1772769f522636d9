//! Grouping and reduction: partitions filtered events by service and
//! reduces each group into raw accumulators in a single pass.

use std::collections::BTreeMap;

use crate::models::{MetricEvent, Severity};

/// Raw per-service accumulators, before any statistics are derived.
///
/// Counts are over requests (weighted by `request_count`); latency and
/// gauge samples are over events (one sample per event regardless of its
/// batch size). Error tallies are kept unmerged, one pair per error
/// event; the breakdown processor merges them later.
#[derive(Debug, Clone)]
pub struct ServiceAccumulator {
    pub service_name: String,
    pub total_requests: u64,
    pub error_count: u64,
    pub response_times: Vec<f64>,
    pub cpu_samples: Vec<f64>,
    pub mem_samples: Vec<f64>,
    pub errors_by_status: Vec<(u16, u64)>,
    pub errors_by_severity: Vec<(Severity, u64)>,
}

impl ServiceAccumulator {
    fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            total_requests: 0,
            error_count: 0,
            response_times: Vec::new(),
            cpu_samples: Vec::new(),
            mem_samples: Vec::new(),
            errors_by_status: Vec::new(),
            errors_by_severity: Vec::new(),
        }
    }

    fn observe(&mut self, event: &MetricEvent) {
        // request_count >= 1 is an input invariant, enforced at the
        // wire boundary; a stray 0 from a direct caller is coerced to 1
        // (same floor policy as the window seconds) so the rate and
        // error-rate divisors stay positive.
        let requests = event.request_count.max(1);

        self.total_requests += requests;
        self.response_times.push(event.response_time_ms);
        // Absent gauges count as 0 in the averages (documented approximation)
        self.cpu_samples.push(event.cpu_usage_pct.unwrap_or(0.0));
        self.mem_samples.push(event.mem_usage_pct.unwrap_or(0.0));

        if event.is_error() {
            self.error_count += requests;
            self.errors_by_status.push((event.status_code, requests));
            self.errors_by_severity.push((event.severity, requests));
        }
    }
}

/// Partition `events` by service name and reduce each group.
///
/// Returns accumulators ordered by service name ascending, so the
/// pre-ranking order is deterministic across runs regardless of input
/// order. Services with no matching events never appear.
pub fn group_events<'a, I>(events: I) -> Vec<ServiceAccumulator>
where
    I: IntoIterator<Item = &'a MetricEvent>,
{
    let mut groups: BTreeMap<&str, ServiceAccumulator> = BTreeMap::new();

    for event in events {
        groups
            .entry(event.service_name.as_str())
            .or_insert_with(|| ServiceAccumulator::new(&event.service_name))
            .observe(event);
    }

    groups.into_values().collect()
}
