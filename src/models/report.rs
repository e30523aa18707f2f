use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::core::aggregate::AggregateSnapshot;

/// Final summary of a run. Built once from a drained aggregate and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_requests: u64,
    pub total_time: Duration,
    pub success_requests: u64,
    pub status_distribution: HashMap<u16, u64>,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub avg_duration: Duration,
    pub requests_per_second: f64,
    pub median_response_ms: u64,
    pub response_time_95_ms: u64,
    pub response_time_99_ms: u64,
}

impl Report {
    /// Derive the report from a finalized snapshot. Pure: the same snapshot
    /// and elapsed time always produce the same report.
    pub fn build(snapshot: &AggregateSnapshot, total_time: Duration, total_requests: u64) -> Report {
        // A claim attempt may be rejected at the exhaustion boundary, but an
        // executed request is never lost, so the merged count is clamped to
        // the requested total.
        let count = snapshot.total_count.min(total_requests);
        let avg_duration = if count > 0 {
            Duration::from_nanos((snapshot.duration_sum.as_nanos() / count as u128) as u64)
        } else {
            Duration::ZERO
        };
        let requests_per_second = if total_time > Duration::ZERO {
            count as f64 / total_time.as_secs_f64()
        } else {
            0.0
        };

        Report {
            total_requests: count,
            total_time,
            success_requests: snapshot.success_count,
            status_distribution: snapshot.status_counts.clone(),
            min_duration: snapshot.min_duration,
            max_duration: snapshot.max_duration,
            avg_duration,
            requests_per_second,
            median_response_ms: snapshot.median_ms,
            response_time_95_ms: snapshot.p95_ms,
            response_time_99_ms: snapshot.p99_ms,
        }
    }
}
