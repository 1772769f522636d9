//! Ranking and limiting: orders finished summaries by the requested
//! criterion, assigns dense ranks, and truncates to the result cap.

use crate::models::{RankBy, ServiceAggregation};

/// Sort `summaries` descending by `criterion`, assign 1-based dense
/// ranks, and keep at most `limit` entries (entries past the cap are
/// dropped, not hidden). The sort is stable, so ties keep their
/// pre-ranking order (service name ascending, from the grouping stage).
pub fn rank_and_limit(
    mut summaries: Vec<ServiceAggregation>,
    criterion: RankBy,
    limit: Option<usize>,
) -> Vec<ServiceAggregation> {
    summaries.sort_by(|a, b| sort_key(b, criterion).total_cmp(&sort_key(a, criterion)));

    for (i, summary) in summaries.iter_mut().enumerate() {
        summary.rank = i + 1;
    }

    if let Some(limit) = limit {
        summaries.truncate(limit);
    }
    summaries
}

fn sort_key(summary: &ServiceAggregation, criterion: RankBy) -> f64 {
    match criterion {
        RankBy::Rate => summary.rate.requests_per_second,
        RankBy::Error => summary.error.error_rate,
        RankBy::Duration => summary.duration.average_response_time,
        RankBy::Saturation => summary
            .saturation
            .average_cpu_usage
            .max(summary.saturation.average_memory_usage),
    }
}
