//! On-demand aggregate statistics over a request-record snapshot.

use super::RequestRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate request statistics computed from one buffer snapshot.
///
/// Never cached; each call recomputes from a fresh snapshot so readers and
/// writers cannot interleave mid-computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    /// Number of sampled requests in the window
    pub count: usize,
    /// Mean duration (ms)
    pub mean_ms: f64,
    /// Median duration (ms)
    pub median_ms: f64,
    /// 95th percentile duration (ms), nearest-rank
    pub p95_ms: f64,
    /// 99th percentile duration (ms), nearest-rank
    pub p99_ms: f64,
    /// Slowest observed duration (ms)
    pub max_ms: f64,
    /// Requests per status code
    pub status_counts: BTreeMap<u16, u64>,
    /// Fraction of requests with status >= 400
    pub error_rate: f64,
}

/// Nearest-rank percentile over an already-sorted sample.
///
/// `p` is a percentage in (0, 100]. The sample must be non-empty.
pub fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Compute a summary from a snapshot, `None` when the window is empty.
pub fn summarize(records: &[RequestRecord]) -> Option<RequestSummary> {
    if records.is_empty() {
        return None;
    }

    let mut durations: Vec<f64> = records.iter().map(|r| r.duration_ms).collect();
    durations.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = durations.len();
    let mean_ms = durations.iter().sum::<f64>() / count as f64;

    let mut status_counts: BTreeMap<u16, u64> = BTreeMap::new();
    let mut errors = 0u64;
    for record in records {
        *status_counts.entry(record.status_code).or_insert(0) += 1;
        if record.status_code >= 400 {
            errors += 1;
        }
    }

    Some(RequestSummary {
        count,
        mean_ms,
        median_ms: nearest_rank(&durations, 50.0),
        p95_ms: nearest_rank(&durations, 95.0),
        p99_ms: nearest_rank(&durations, 99.0),
        max_ms: *durations.last().unwrap_or(&0.0),
        status_counts,
        error_rate: errors as f64 / count as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(status: u16, duration_ms: f64) -> RequestRecord {
        RequestRecord {
            method: "GET".to_string(),
            path: "/api/projects".to_string(),
            status_code: status,
            duration_ms,
            memory_delta_bytes: 0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_snapshot_yields_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_single_record_all_statistics_collapse() {
        let summary = summarize(&[record(200, 42.0)]).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean_ms, 42.0);
        assert_eq!(summary.median_ms, 42.0);
        assert_eq!(summary.p95_ms, 42.0);
        assert_eq!(summary.p99_ms, 42.0);
        assert_eq!(summary.error_rate, 0.0);
    }

    #[test]
    fn test_nearest_rank_on_hundred_samples() {
        let sorted: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        assert_eq!(nearest_rank(&sorted, 50.0), 50.0);
        assert_eq!(nearest_rank(&sorted, 95.0), 95.0);
        assert_eq!(nearest_rank(&sorted, 99.0), 99.0);
        assert_eq!(nearest_rank(&sorted, 100.0), 100.0);
    }

    #[test]
    fn test_percentiles_are_ordered() {
        let records: Vec<RequestRecord> =
            (0..37).map(|i| record(200, (i * 13 % 101) as f64)).collect();
        let summary = summarize(&records).unwrap();
        let min = records
            .iter()
            .map(|r| r.duration_ms)
            .fold(f64::INFINITY, f64::min);

        assert!(summary.p99_ms >= summary.p95_ms);
        assert!(summary.p95_ms >= summary.median_ms);
        assert!(summary.median_ms >= min);
        assert!(summary.max_ms >= summary.p99_ms);
    }

    #[test]
    fn test_error_rate_counts_status_400_and_above() {
        let records = vec![
            record(200, 10.0),
            record(201, 12.0),
            record(404, 8.0),
            record(500, 30.0),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.error_rate, 0.5);
        assert_eq!(summary.status_counts[&200], 1);
        assert_eq!(summary.status_counts[&404], 1);
        assert_eq!(summary.status_counts[&500], 1);
    }

    #[test]
    fn test_mean_over_known_samples() {
        let records = vec![record(200, 10.0), record(200, 20.0), record(200, 30.0)];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.mean_ms, 20.0);
        assert_eq!(summary.median_ms, 20.0);
    }
}
