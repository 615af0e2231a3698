//! Per-client request windows.
//!
//! A request window holds the ordered timestamps of a client's recent
//! requests together with the instant the record was first created. The
//! admission window is sliding-by-filter: every check prunes timestamps
//! that fell out of the trailing window before counting, so no separate
//! reset event exists and a missed cleanup cycle can only leave stale
//! entries, never wrong admission decisions.

use std::collections::VecDeque;
use std::time::Instant;

/// Ordered request history for a single client fingerprint.
#[derive(Debug, Clone)]
pub struct RequestWindow {
    /// Request timestamps, oldest first.
    timestamps: VecDeque<Instant>,
    /// When this record was first created.
    created_at: Instant,
}

impl RequestWindow {
    /// Create an empty window record.
    pub fn new(created_at: Instant) -> Self {
        Self {
            timestamps: VecDeque::new(),
            created_at,
        }
    }

    /// Drop timestamps at or before `keep_after`.
    ///
    /// Only strictly newer timestamps survive; the sequence stays ordered
    /// so expired entries are always at the front.
    pub fn prune(&mut self, keep_after: Instant) {
        while let Some(&oldest) = self.timestamps.front() {
            if oldest <= keep_after {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record a request at `now`.
    pub fn record(&mut self, now: Instant) {
        self.timestamps.push_back(now);
    }

    /// Number of timestamps currently held.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the window holds no timestamps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The oldest held timestamp, if any.
    pub fn oldest(&self) -> Option<Instant> {
        self.timestamps.front().copied()
    }

    /// When this record was first created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Count timestamps strictly newer than `keep_after` without mutating.
    ///
    /// The read-only counterpart of [`prune`](Self::prune), used by the
    /// stats path which must not modify client state.
    pub fn count_after(&self, keep_after: Instant) -> usize {
        self.timestamps.iter().filter(|&&t| t > keep_after).count()
    }

    /// The oldest timestamp strictly newer than `keep_after`, if any.
    pub fn oldest_after(&self, keep_after: Instant) -> Option<Instant> {
        self.timestamps.iter().find(|&&t| t > keep_after).copied()
    }

    /// Apply the retention sweep against `cutoff`.
    ///
    /// Drops timestamps at or before the cutoff. Returns `true` when the
    /// record must be retained: a record with any surviving timestamp is
    /// never deleted, regardless of age; an empty record is deleted only
    /// once its creation time has also passed the cutoff.
    pub fn sweep(&mut self, cutoff: Instant) -> bool {
        self.prune(cutoff);
        !(self.timestamps.is_empty() && self.created_at <= cutoff)
    }
}
