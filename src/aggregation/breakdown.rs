//! Error breakdown processing: collapses raw per-event error tallies
//! into sorted, percentage-annotated distributions.

use crate::models::{Severity, SeverityBreakdownEntry, StatusBreakdownEntry};

use super::stats::round2;

/// Breakdown of a service's errors by status code.
pub fn status_breakdown(tallies: &[(u16, u64)], error_count: u64) -> Vec<StatusBreakdownEntry> {
    merge(tallies, error_count)
        .into_iter()
        .map(|(status_code, count, percentage)| StatusBreakdownEntry {
            status_code,
            count,
            percentage,
        })
        .collect()
}

/// Breakdown of a service's errors by severity label.
pub fn severity_breakdown(
    tallies: &[(Severity, u64)],
    error_count: u64,
) -> Vec<SeverityBreakdownEntry> {
    merge(tallies, error_count)
        .into_iter()
        .map(|(severity, count, percentage)| SeverityBreakdownEntry {
            severity,
            count,
            percentage,
        })
        .collect()
}

/// Merge tallies sharing a key, annotate with percentage-of-errors, and
/// sort by descending count. The sort is stable, so ties keep first-seen
/// insertion order.
fn merge<K: Copy + PartialEq>(tallies: &[(K, u64)], error_count: u64) -> Vec<(K, u64, f64)> {
    let mut merged: Vec<(K, u64)> = Vec::new();
    for &(key, count) in tallies {
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, total)) => *total += count,
            None => merged.push((key, count)),
        }
    }

    let mut entries: Vec<(K, u64, f64)> = merged
        .into_iter()
        .map(|(key, count)| {
            let percentage = if error_count == 0 {
                0.0
            } else {
                round2(100.0 * count as f64 / error_count as f64)
            };
            (key, count, percentage)
        })
        .collect();

    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_shared_keys() {
        let tallies = vec![(500, 2), (404, 1), (500, 3)];
        let entries = status_breakdown(&tallies, 6);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status_code, 500);
        assert_eq!(entries[0].count, 5);
        assert_eq!(entries[1].status_code, 404);
        assert_eq!(entries[1].count, 1);
    }

    #[test]
    fn test_percentages_are_of_errors_and_sum_to_100() {
        let tallies = vec![(500, 2), (404, 1)];
        let entries = status_breakdown(&tallies, 3);

        assert_eq!(entries[0].percentage, 66.67);
        assert_eq!(entries[1].percentage, 33.33);
        let total: f64 = entries.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_sorted_by_descending_count() {
        let tallies = vec![(401, 1), (500, 7), (503, 4)];
        let entries = status_breakdown(&tallies, 12);
        let counts: Vec<u64> = entries.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![7, 4, 1]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let tallies = vec![(404, 3), (500, 3), (503, 3)];
        let entries = status_breakdown(&tallies, 9);
        let codes: Vec<u16> = entries.iter().map(|e| e.status_code).collect();
        assert_eq!(codes, vec![404, 500, 503]);
    }

    #[test]
    fn test_zero_error_count_yields_zero_percentages() {
        let tallies = vec![(500, 2)];
        let entries = status_breakdown(&tallies, 0);
        assert_eq!(entries[0].percentage, 0.0);
    }

    #[test]
    fn test_severity_breakdown_shape() {
        let tallies = vec![
            (Severity::High, 2),
            (Severity::Critical, 5),
            (Severity::High, 1),
        ];
        let entries = severity_breakdown(&tallies, 8);

        assert_eq!(entries[0].severity, Severity::Critical);
        assert_eq!(entries[0].count, 5);
        assert_eq!(entries[1].severity, Severity::High);
        assert_eq!(entries[1].count, 3);
    }
}
