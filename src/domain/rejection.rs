//! Bounded audit log of denied requests.
//!
//! Every denial appends an immutable entry. The log is capped so a client
//! stuck in a rejection loop cannot grow memory without bound: once the
//! cap is exceeded the log is truncated to the newest half-cap entries.

use crate::domain::fingerprint::ClientFingerprint;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Hard cap on retained rejection entries.
pub const MAX_ENTRIES: usize = 1000;

/// Number of newest entries kept after an overflow truncation.
pub const KEEP_ON_OVERFLOW: usize = 500;

/// Immutable record of a single denied request.
#[derive(Debug, Clone)]
pub struct RejectionLogEntry {
    /// The fingerprint whose request was denied.
    pub fingerprint: ClientFingerprint,
    /// Monotonic instant of the denial.
    pub at: Instant,
    /// Wall-clock time of the denial, for humans and exports.
    pub recorded_at: DateTime<Utc>,
    /// Why the request was denied.
    pub reason: &'static str,
    /// The admission ceiling in force at the time.
    pub limit: u32,
    /// The window width in force at the time.
    pub window: Duration,
}

impl RejectionLogEntry {
    /// RFC 3339 rendering of the wall-clock denial time.
    pub fn iso_date(&self) -> String {
        self.recorded_at.to_rfc3339()
    }
}

/// Append-only, capped log of rejection entries.
#[derive(Debug, Default)]
pub struct RejectionLog {
    entries: VecDeque<RejectionLogEntry>,
}

impl RejectionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Append an entry, truncating to the newest [`KEEP_ON_OVERFLOW`]
    /// entries once the length exceeds [`MAX_ENTRIES`].
    ///
    /// Truncation is O(1) amortized: it happens at most once per half-cap
    /// appends.
    pub fn push(&mut self, entry: RejectionLogEntry) {
        self.entries.push_back(entry);
        if self.entries.len() > MAX_ENTRIES {
            let drop = self.entries.len() - KEEP_ON_OVERFLOW;
            self.entries.drain(..drop);
        }
    }

    /// The most recent `limit` entries, oldest-to-newest.
    pub fn recent(&self, limit: usize) -> Vec<RejectionLogEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
