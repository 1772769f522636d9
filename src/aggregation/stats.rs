//! Statistics derivation: rates, latency distribution, and resource
//! saturation classification for one reduced service group.

use crate::models::{DurationMetrics, RateMetrics, ResourceLevel, SaturationMetrics};

use super::group::ServiceAccumulator;

/// Round to 2 decimal places, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Request rates over the resolved window. `window_seconds` is floored
/// at 1 by the query normalizer, so the divisions are always defined.
pub fn compute_rates(total_requests: u64, window_seconds: i64) -> RateMetrics {
    let secs = window_seconds as f64;
    RateMetrics {
        requests_per_second: round2(total_requests as f64 / secs),
        requests_per_minute: round2(total_requests as f64 / (secs / 60.0)),
        total_requests,
    }
}

/// Percentage of requests that failed. Emitted groups always have at
/// least one request, so the divisor is positive.
pub fn compute_error_rate(error_count: u64, total_requests: u64) -> f64 {
    round2(100.0 * error_count as f64 / total_requests as f64)
}

/// Latency distribution over the group's per-event samples.
///
/// The median is the element at index `n / 2` of the ascending sort
/// (the upper-middle value for even n, kept for compatibility with the
/// original system rather than the textbook two-value average). The
/// p95/p99 indices `floor(n * q)` are clamped to `n - 1`.
pub fn compute_durations(samples: &[f64]) -> DurationMetrics {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let sum: f64 = sorted.iter().sum();

    DurationMetrics {
        average_response_time: round2(sum / n as f64),
        median_response_time: sorted[n / 2],
        p95_response_time: sorted[percentile_index(n, 0.95)],
        p99_response_time: sorted[percentile_index(n, 0.99)],
        min_response_time: sorted[0],
        max_response_time: sorted[n - 1],
    }
}

/// Index `floor(n * q)`, clamped into bounds.
fn percentile_index(n: usize, q: f64) -> usize {
    ((n as f64 * q).floor() as usize).min(n - 1)
}

/// Resource saturation summary over the group's 0-substituted gauges.
pub fn compute_saturation(cpu_samples: &[f64], mem_samples: &[f64]) -> SaturationMetrics {
    let average_cpu = round2(mean(cpu_samples));
    let average_mem = round2(mean(mem_samples));

    SaturationMetrics {
        average_cpu_usage: average_cpu,
        max_cpu_usage: max(cpu_samples),
        average_memory_usage: average_mem,
        max_memory_usage: max(mem_samples),
        resource_utilization: classify_utilization(average_cpu.max(average_mem)),
    }
}

/// Band boundaries are inclusive on the lower bound.
fn classify_utilization(m: f64) -> ResourceLevel {
    if m >= 90.0 {
        ResourceLevel::Critical
    } else if m >= 70.0 {
        ResourceLevel::High
    } else if m >= 50.0 {
        ResourceLevel::Medium
    } else {
        ResourceLevel::Low
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn max(samples: &[f64]) -> f64 {
    samples.iter().copied().fold(0.0, f64::max)
}

/// Convenience wrapper deriving all three stat blocks for one group.
pub fn derive(
    acc: &ServiceAccumulator,
    window_seconds: i64,
) -> (RateMetrics, f64, DurationMetrics, SaturationMetrics) {
    (
        compute_rates(acc.total_requests, window_seconds),
        compute_error_rate(acc.error_count, acc.total_requests),
        compute_durations(&acc.response_times),
        compute_saturation(&acc.cpu_samples, &acc.mem_samples),
    )
}
