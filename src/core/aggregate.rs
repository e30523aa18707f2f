use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use histogram::Histogram;
use parking_lot::Mutex;

use crate::models::outcome::Outcome;

/// Running statistics shared by every worker for the lifetime of a run.
///
/// Counters and the duration extremes are atomics; the status map and the
/// latency histogram sit behind short mutex sections. `merge` is safe under
/// any interleaving of callers.
pub struct AggregateState {
    total_count: AtomicU64,
    success_count: AtomicU64,
    duration_sum_ns: AtomicU64,
    min_ns: AtomicU64,
    max_ns: AtomicU64,
    status_counts: Mutex<HashMap<u16, u64>>,
    latencies: Mutex<Histogram>,
}

/// Stable copy of the aggregate, taken once after the run has drained.
#[derive(Debug, Clone)]
pub struct AggregateSnapshot {
    pub total_count: u64,
    pub success_count: u64,
    pub duration_sum: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub status_counts: HashMap<u16, u64>,
    pub median_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
}

impl AggregateState {
    pub fn new() -> anyhow::Result<Self> {
        Ok(AggregateState {
            total_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            duration_sum_ns: AtomicU64::new(0),
            // Seeded so the first real observation always wins.
            min_ns: AtomicU64::new(u64::MAX),
            max_ns: AtomicU64::new(0),
            status_counts: Mutex::new(HashMap::new()),
            latencies: Mutex::new(
                Histogram::new(10, 20).context("failed to build latency histogram")?,
            ),
        })
    }

    /// Fold one outcome into the running totals. Callable concurrently from
    /// any number of workers with no lost updates.
    pub fn merge(&self, outcome: &Outcome) {
        let ns = outcome.duration.as_nanos() as u64;

        self.total_count.fetch_add(1, Ordering::Relaxed);
        if outcome.is_success() {
            self.success_count.fetch_add(1, Ordering::Relaxed);
        }
        self.duration_sum_ns.fetch_add(ns, Ordering::Relaxed);

        // Load, compare, swap, retry: a racing update can move the extreme
        // past us, at which point our observation no longer qualifies.
        let mut current = self.min_ns.load(Ordering::Relaxed);
        while ns < current {
            match self.min_ns.compare_exchange_weak(
                current,
                ns,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
        let mut current = self.max_ns.load(Ordering::Relaxed);
        while ns > current {
            match self.max_ns.compare_exchange_weak(
                current,
                ns,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        *self.status_counts.lock().entry(outcome.status).or_insert(0) += 1;

        if let Err(e) = self
            .latencies
            .lock()
            .increment(outcome.duration.as_millis() as u64)
        {
            eprintln!("latency histogram increment failed: {e:?}");
        }
    }

    /// Stable copy of the current totals. The orchestrator only calls this
    /// after both join phases, so nothing is still merging.
    pub fn snapshot(&self) -> AggregateSnapshot {
        let total_count = self.total_count.load(Ordering::Relaxed);
        let min_ns = self.min_ns.load(Ordering::Relaxed);
        let latencies = self.latencies.lock();
        AggregateSnapshot {
            total_count,
            success_count: self.success_count.load(Ordering::Relaxed),
            duration_sum: Duration::from_nanos(self.duration_sum_ns.load(Ordering::Relaxed)),
            min_duration: if total_count == 0 {
                Duration::ZERO
            } else {
                Duration::from_nanos(min_ns)
            },
            max_duration: Duration::from_nanos(self.max_ns.load(Ordering::Relaxed)),
            status_counts: self.status_counts.lock().clone(),
            median_ms: percentile_or_zero(&latencies, 50.0),
            p95_ms: percentile_or_zero(&latencies, 95.0),
            p99_ms: percentile_or_zero(&latencies, 99.0),
        }
    }
}

fn percentile_or_zero(latencies: &Histogram, percentile: f64) -> u64 {
    match latencies.percentile(percentile) {
        Ok(bucket) => *bucket.range().start(),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::SystemTime;

    fn outcome(status: u16, ms: u64) -> Outcome {
        Outcome {
            status,
            duration: Duration::from_millis(ms),
            completed_at: SystemTime::now(),
        }
    }

    #[test]
    fn merge_tracks_counts_and_extremes() {
        let aggregate = AggregateState::new().unwrap();
        aggregate.merge(&outcome(200, 10));
        aggregate.merge(&outcome(500, 30));
        aggregate.merge(&outcome(200, 20));

        let snapshot = aggregate.snapshot();
        assert_eq!(snapshot.total_count, 3);
        assert_eq!(snapshot.success_count, 2);
        assert_eq!(snapshot.min_duration, Duration::from_millis(10));
        assert_eq!(snapshot.max_duration, Duration::from_millis(30));
        assert_eq!(snapshot.duration_sum, Duration::from_millis(60));
        assert_eq!(snapshot.status_counts[&200], 2);
        assert_eq!(snapshot.status_counts[&500], 1);
        assert_eq!(snapshot.status_counts.values().sum::<u64>(), 3);
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let snapshot = AggregateState::new().unwrap().snapshot();
        assert_eq!(snapshot.total_count, 0);
        assert_eq!(snapshot.success_count, 0);
        assert_eq!(snapshot.min_duration, Duration::ZERO);
        assert_eq!(snapshot.max_duration, Duration::ZERO);
        assert_eq!(snapshot.median_ms, 0);
        assert_eq!(snapshot.p99_ms, 0);
    }

    #[test]
    fn sentinel_outcomes_are_not_successes() {
        let aggregate = AggregateState::new().unwrap();
        aggregate.merge(&outcome(Outcome::ERROR_STATUS, 5));
        let snapshot = aggregate.snapshot();
        assert_eq!(snapshot.success_count, 0);
        assert_eq!(snapshot.status_counts[&0], 1);
    }

    #[test]
    fn concurrent_merges_lose_nothing() {
        let aggregate = Arc::new(AggregateState::new().unwrap());
        let mut handles = Vec::new();
        for worker in 0..8u64 {
            let aggregate = Arc::clone(&aggregate);
            handles.push(std::thread::spawn(move || {
                for i in 0..500u64 {
                    let status = if i % 2 == 0 { 200 } else { 503 };
                    aggregate.merge(&outcome(status, worker * 500 + i + 1));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = aggregate.snapshot();
        assert_eq!(snapshot.total_count, 4000);
        assert_eq!(snapshot.success_count, 2000);
        assert_eq!(snapshot.status_counts.values().sum::<u64>(), 4000);
        // Durations spanned 1..=4000 ms; the racing CAS updates must land on
        // the true extremes.
        assert_eq!(snapshot.min_duration, Duration::from_millis(1));
        assert_eq!(snapshot.max_duration, Duration::from_millis(4000));
    }
}
