//! Observability metrics for request admission.
//!
//! Provides counters about admission behavior for monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Metrics are collected throughout the admission process and can be
/// queried at any time for observability.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of requests admitted
    requests_allowed: AtomicU64,
    /// Total number of requests rejected
    requests_rejected: AtomicU64,
    /// Total number of client records removed by cleanup
    clients_evicted: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_allowed: AtomicU64::new(0),
                requests_rejected: AtomicU64::new(0),
                clients_evicted: AtomicU64::new(0),
            }),
        }
    }

    /// Record an admitted request.
    pub(crate) fn record_allowed(&self) {
        self.inner.requests_allowed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected request.
    pub(crate) fn record_rejected(&self) {
        self.inner.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record client records removed by cleanup.
    pub(crate) fn record_evicted(&self, count: u64) {
        self.inner.clients_evicted.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the total number of requests admitted.
    pub fn requests_allowed(&self) -> u64 {
        self.inner.requests_allowed.load(Ordering::Relaxed)
    }

    /// Get the total number of requests rejected.
    pub fn requests_rejected(&self) -> u64 {
        self.inner.requests_rejected.load(Ordering::Relaxed)
    }

    /// Get the total number of client records removed by cleanup.
    pub fn clients_evicted(&self) -> u64 {
        self.inner.clients_evicted.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_allowed: self.requests_allowed(),
            requests_rejected: self.requests_rejected(),
            clients_evicted: self.clients_evicted(),
        }
    }

    /// Reset all metrics to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.requests_allowed.store(0, Ordering::Relaxed);
        self.inner.requests_rejected.store(0, Ordering::Relaxed);
        self.inner.clients_evicted.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total number of requests admitted
    pub requests_allowed: u64,
    /// Total number of requests rejected
    pub requests_rejected: u64,
    /// Total number of client records removed by cleanup
    pub clients_evicted: u64,
}

impl MetricsSnapshot {
    /// Calculate the rejection rate (0.0 to 1.0).
    ///
    /// Returns the ratio of rejected requests to total requests.
    /// Returns 0.0 if no requests have been processed.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.requests_allowed.saturating_add(self.requests_rejected);
        if total == 0 {
            0.0
        } else {
            self.requests_rejected as f64 / total as f64
        }
    }

    /// Get the total number of requests processed (allowed + rejected).
    pub fn total_requests(&self) -> u64 {
        self.requests_allowed.saturating_add(self.requests_rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(metrics.requests_allowed(), 0);
        assert_eq!(metrics.requests_rejected(), 0);
        assert_eq!(metrics.clients_evicted(), 0);
    }

    #[test]
    fn test_record_allowed() {
        let metrics = Metrics::new();
        metrics.record_allowed();
        metrics.record_allowed();
        metrics.record_allowed();
        assert_eq!(metrics.requests_allowed(), 3);
        assert_eq!(metrics.requests_rejected(), 0);
    }

    #[test]
    fn test_record_rejected() {
        let metrics = Metrics::new();
        metrics.record_rejected();
        metrics.record_rejected();
        assert_eq!(metrics.requests_allowed(), 0);
        assert_eq!(metrics.requests_rejected(), 2);
    }

    #[test]
    fn test_record_evicted() {
        let metrics = Metrics::new();
        metrics.record_evicted(3);
        assert_eq!(metrics.clients_evicted(), 3);
    }

    #[test]
    fn test_snapshot() {
        let metrics = Metrics::new();
        metrics.record_allowed();
        metrics.record_allowed();
        metrics.record_rejected();
        metrics.record_evicted(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_allowed, 2);
        assert_eq!(snapshot.requests_rejected, 1);
        assert_eq!(snapshot.clients_evicted, 1);
    }

    #[test]
    fn test_snapshot_rejection_rate() {
        let metrics = Metrics::new();

        // No requests - rate should be 0
        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        // 1 allowed, 0 rejected - rate should be 0
        metrics.record_allowed();
        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        // 1 allowed, 1 rejected - rate should be 0.5
        metrics.record_rejected();
        assert!((metrics.snapshot().rejection_rate() - 0.5).abs() < f64::EPSILON);

        // 1 allowed, 3 rejected - rate should be 0.75
        metrics.record_rejected();
        metrics.record_rejected();
        assert!((metrics.snapshot().rejection_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_total_requests() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().total_requests(), 0);

        metrics.record_allowed();
        metrics.record_allowed();
        metrics.record_rejected();
        assert_eq!(metrics.snapshot().total_requests(), 3);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_allowed();
        metrics.record_rejected();
        metrics.record_evicted(1);

        metrics.reset();
        assert_eq!(metrics.requests_allowed(), 0);
        assert_eq!(metrics.requests_rejected(), 0);
        assert_eq!(metrics.clients_evicted(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics1 = Metrics::new();
        metrics1.record_allowed();

        let metrics2 = metrics1.clone();
        metrics2.record_allowed();

        // Both should see the same value (shared Arc)
        assert_eq!(metrics1.requests_allowed(), 2);
        assert_eq!(metrics2.requests_allowed(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = vec![];

        // Spawn 10 threads, each recording 100 requests
        for _ in 0..10 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    m.record_allowed();
                    m.record_rejected();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.requests_allowed(), 1000);
        assert_eq!(metrics.requests_rejected(), 1000);
    }
}
