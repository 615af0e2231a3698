//! Request admission governor.
//!
//! The governor decides, per client fingerprint, whether a request may
//! proceed. It keeps a sliding window of recent request timestamps per
//! client, a bounded log of rejections, and counters for observability.
//!
//! All decision logic runs against injected ports ([`Clock`],
//! [`ClientIdentity`], [`Storage`]), so the governor is fully
//! deterministic under test.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::application::metrics::{Metrics, MetricsSnapshot};
use crate::application::ports::{ClientIdentity, Clock, Storage};
use crate::domain::fingerprint::ClientFingerprint;
use crate::domain::rejection::{RejectionLog, RejectionLogEntry};
use crate::domain::window::RequestWindow;
use crate::infrastructure::storage::ShardedStore;

/// Default maximum number of admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default sliding window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default number of entries returned by rejection queries.
pub const DEFAULT_REJECTION_LIMIT: usize = 50;

/// Reason string recorded with every rejection.
const REJECTION_REASON: &str = "Rate limit exceeded";

/// Admission parameters for the governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernorConfig {
    /// Maximum number of requests admitted within one window.
    pub max_requests: u32,
    /// Length of the sliding window.
    pub window: Duration,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Read-only view of one client's current admission state.
///
/// Produced by [`Governor::client_stats`]; computing it never creates
/// or mutates any record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientStats {
    /// Requests currently inside the window.
    pub request_count: u32,
    /// Requests the client may still make before hitting the limit.
    pub remaining_requests: u32,
    /// When the oldest in-window request ages out, freeing capacity.
    ///
    /// For a client with no in-window requests this is one full window
    /// from now.
    pub reset_time: Instant,
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The request was admitted and counted against the window.
    Allow,
    /// The request was rejected; nothing was counted.
    Deny(ClientStats),
}

impl AdmissionDecision {
    /// Whether the decision admits the request.
    pub fn is_allow(&self) -> bool {
        matches!(self, AdmissionDecision::Allow)
    }
}

/// Error returned when the governor is misconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// `max_requests` must be at least 1.
    ZeroMaxRequests,
    /// `window` must be non-zero.
    ZeroWindow,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::ZeroMaxRequests => write!(f, "max_requests must be at least 1"),
            BuildError::ZeroWindow => write!(f, "window must be non-zero"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Sliding-window request admission governor.
///
/// Generic over the storage port so tests can substitute instrumented
/// stores; [`GovernorBuilder`] wires the default sharded store.
#[derive(Debug)]
pub struct Governor<S>
where
    S: Storage<ClientFingerprint, RequestWindow>,
{
    storage: S,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn ClientIdentity>,
    config: GovernorConfig,
    rejections: Mutex<RejectionLog>,
    metrics: Metrics,
    #[cfg(feature = "async")]
    cleanup_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Governor<ShardedStore<ClientFingerprint, RequestWindow>> {
    /// Start building a governor with default storage.
    pub fn builder() -> GovernorBuilder {
        GovernorBuilder::new()
    }
}

impl<S> Governor<S>
where
    S: Storage<ClientFingerprint, RequestWindow>,
{
    /// Assemble a governor from explicit parts.
    ///
    /// Prefer [`Governor::builder`] unless you need a custom storage
    /// implementation.
    pub fn from_parts(
        storage: S,
        clock: Arc<dyn Clock>,
        identity: Arc<dyn ClientIdentity>,
        config: GovernorConfig,
    ) -> Self {
        Self {
            storage,
            clock,
            identity,
            config,
            rejections: Mutex::new(RejectionLog::new()),
            metrics: Metrics::new(),
            #[cfg(feature = "async")]
            cleanup_task: Mutex::new(None),
        }
    }

    /// The configuration this governor runs with.
    pub fn config(&self) -> GovernorConfig {
        self.config
    }

    /// Check admission for the current caller.
    ///
    /// On `Allow` the request is recorded against the caller's window;
    /// on `Deny` nothing is recorded and a rejection entry is logged.
    pub fn check(&self) -> AdmissionDecision {
        self.check_for(self.identity.fingerprint())
    }

    /// Check admission for an explicit fingerprint.
    pub fn check_for(&self, fingerprint: ClientFingerprint) -> AdmissionDecision {
        let now = self.clock.now();
        let keep_after = now.checked_sub(self.config.window);
        let max = self.config.max_requests;

        let admitted =
            self.storage
                .with_entry_mut(fingerprint, || RequestWindow::new(now), |window| {
                    if let Some(cutoff) = keep_after {
                        window.prune(cutoff);
                    }
                    if window.len() as u32 >= max {
                        false
                    } else {
                        window.record(now);
                        true
                    }
                });

        if admitted {
            self.metrics.record_allowed();
            tracing::trace!(client = %fingerprint, "request admitted");
            return AdmissionDecision::Allow;
        }

        self.metrics.record_rejected();
        let stats = self.stats_for(fingerprint);
        self.log_rejection(fingerprint, now);
        tracing::warn!(
            client = %fingerprint,
            limit = max,
            window_secs = self.config.window.as_secs(),
            "request rejected"
        );
        AdmissionDecision::Deny(stats)
    }

    /// Convenience wrapper over [`check`](Self::check).
    pub fn is_allowed(&self) -> bool {
        self.check().is_allow()
    }

    /// Current admission state for the calling client.
    pub fn client_stats(&self) -> ClientStats {
        self.stats_for(self.identity.fingerprint())
    }

    /// Current admission state for an explicit fingerprint.
    ///
    /// Purely observational: absent clients get a full allowance and a
    /// reset one window from now, and no record is created.
    pub fn stats_for(&self, fingerprint: ClientFingerprint) -> ClientStats {
        let now = self.clock.now();
        let keep_after = now.checked_sub(self.config.window);

        let (count, oldest) = self
            .storage
            .with_entry(&fingerprint, |window| match keep_after {
                Some(cutoff) => (window.count_after(cutoff), window.oldest_after(cutoff)),
                None => (window.len(), window.oldest()),
            })
            .unwrap_or((0, None));

        let count = count as u32;
        let reset_time = match oldest {
            Some(t) => t + self.config.window,
            None => now + self.config.window,
        };

        ClientStats {
            request_count: count,
            remaining_requests: self.config.max_requests.saturating_sub(count),
            reset_time,
        }
    }

    /// The most recent rejection entries, oldest first.
    ///
    /// [`DEFAULT_REJECTION_LIMIT`] is the conventional query size.
    pub fn recent_rejections(&self, limit: usize) -> Vec<RejectionLogEntry> {
        self.lock_rejections().recent(limit)
    }

    /// Number of rejection entries currently retained.
    pub fn rejection_count(&self) -> usize {
        self.lock_rejections().len()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.storage.len()
    }

    /// Snapshot of the admission counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Drop stale client records.
    ///
    /// A record survives if it still holds a timestamp newer than twice
    /// the window, or if it was created recently enough that an empty
    /// window is expected.
    pub fn cleanup(&self) {
        let now = self.clock.now();
        let Some(cutoff) = now.checked_sub(self.config.window * 2) else {
            return;
        };

        let before = self.storage.len();
        self.storage.retain(|_, window| window.sweep(cutoff));
        let evicted = before.saturating_sub(self.storage.len());

        if evicted > 0 {
            self.metrics.record_evicted(evicted as u64);
        }
        tracing::debug!(evicted, remaining = self.storage.len(), "cleanup pass");
    }

    /// Release everything the governor holds.
    ///
    /// Stops the periodic cleanup task (if running) and clears all
    /// client records and rejection entries. Safe to call repeatedly.
    pub fn dispose(&self) {
        #[cfg(feature = "async")]
        {
            let mut guard = lock_ignore_poison(&self.cleanup_task);
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
        self.storage.clear();
        self.lock_rejections().clear();
        tracing::debug!("governor disposed");
    }

    fn log_rejection(&self, fingerprint: ClientFingerprint, at: Instant) {
        let entry = RejectionLogEntry {
            fingerprint,
            at,
            recorded_at: self.clock.wall_now(),
            reason: REJECTION_REASON,
            limit: self.config.max_requests,
            window: self.config.window,
        };
        self.lock_rejections().push(entry);
    }

    fn lock_rejections(&self) -> std::sync::MutexGuard<'_, RejectionLog> {
        lock_ignore_poison(&self.rejections)
    }
}

#[cfg(feature = "async")]
impl<S> Governor<S>
where
    S: Storage<ClientFingerprint, RequestWindow> + 'static,
{
    /// Spawn the periodic cleanup task on the current tokio runtime.
    ///
    /// Runs [`cleanup`](Self::cleanup) once per window. The task holds
    /// only a weak reference, so dropping the last `Arc` stops it; a
    /// second call while a task is running is a no-op.
    pub fn start_cleanup(self: &Arc<Self>) {
        let mut guard = lock_ignore_poison(&self.cleanup_task);
        if guard.is_some() {
            return;
        }

        let weak = Arc::downgrade(self);
        let period = self.config.window;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(governor) => governor.cleanup(),
                    None => break,
                }
            }
        }));
    }
}

/// Recover the guard even if a holder panicked; the protected state
/// stays internally consistent either way.
fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Builder assembling a [`Governor`] over the default sharded store.
#[derive(Debug, Default)]
pub struct GovernorBuilder {
    max_requests: Option<u32>,
    window: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
    identity: Option<Arc<dyn ClientIdentity>>,
}

impl GovernorBuilder {
    /// Create a builder with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum admitted requests per window (default 5).
    pub fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = Some(max_requests);
        self
    }

    /// Sliding window length (default 60 seconds).
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    /// Override the clock (default: system clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Override the identity provider (default: environment-derived).
    pub fn with_identity(mut self, identity: Arc<dyn ClientIdentity>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Validate the configuration and build the governor.
    pub fn build(
        self,
    ) -> Result<Governor<ShardedStore<ClientFingerprint, RequestWindow>>, BuildError> {
        let max_requests = self.max_requests.unwrap_or(DEFAULT_MAX_REQUESTS);
        if max_requests == 0 {
            return Err(BuildError::ZeroMaxRequests);
        }

        let window = self.window.unwrap_or(DEFAULT_WINDOW);
        if window.is_zero() {
            return Err(BuildError::ZeroWindow);
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(crate::infrastructure::clock::SystemClock::new()));
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(crate::infrastructure::identity::EnvironmentIdentity::new()));

        Ok(Governor::from_parts(
            ShardedStore::new(),
            clock,
            identity,
            GovernorConfig {
                max_requests,
                window,
            },
        ))
    }
}
