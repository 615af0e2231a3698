//! Compatibility analysis orchestrator.
//!
//! Ties the admission governor to an analysis backend: every analysis
//! first passes the governor, then runs against the backend under a
//! deadline, and degrades to the local generator when the backend
//! fails in any way. Only throttling surfaces to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::governor::{AdmissionDecision, Governor};
use crate::application::ports::{AnalysisBackend, BackendError, Storage};
use crate::domain::compat::{CompatibilityReport, MatchInput};
use crate::domain::fallback::FallbackGenerator;
use crate::domain::fingerprint::ClientFingerprint;
use crate::domain::window::RequestWindow;

/// Default deadline for one backend call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Which path produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    /// The remote analysis backend answered.
    Model,
    /// The local generator filled in after a backend failure.
    Local,
}

/// A completed analysis together with its provenance.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The compatibility report, identical in shape for both sources.
    pub report: CompatibilityReport,
    /// Which path produced the report.
    pub source: AnalysisSource,
}

/// The caller exceeded its admission allowance.
///
/// Carries enough state for the caller to tell the user when to retry.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("rate limit exceeded, {remaining_requests} requests remaining")]
pub struct ThrottledError {
    /// Requests still available in the current window (zero when denied).
    pub remaining_requests: u32,
    /// When capacity frees up again.
    pub reset_time: Instant,
}

impl ThrottledError {
    /// How long the caller should wait before retrying, measured from `now`.
    pub fn wait_hint(&self, now: Instant) -> Duration {
        self.reset_time.saturating_duration_since(now)
    }

    /// Whole minutes until capacity returns, rounded up. Suitable for
    /// user-facing retry messages.
    pub fn wait_minutes(&self, now: Instant) -> u64 {
        self.wait_hint(now).as_secs().div_ceil(60)
    }
}

/// Orchestrates admission, backend analysis and local fallback.
#[derive(Debug)]
pub struct Orchestrator<S, B>
where
    S: Storage<ClientFingerprint, RequestWindow>,
    B: AnalysisBackend,
{
    governor: Arc<Governor<S>>,
    backend: B,
    fallback: FallbackGenerator,
    deadline: Duration,
}

impl<S, B> Orchestrator<S, B>
where
    S: Storage<ClientFingerprint, RequestWindow>,
    B: AnalysisBackend,
{
    /// Create an orchestrator with the default backend deadline.
    pub fn new(governor: Arc<Governor<S>>, backend: B) -> Self {
        Self {
            governor,
            backend,
            fallback: FallbackGenerator::new(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Override the backend deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// The governor this orchestrator consults.
    pub fn governor(&self) -> &Governor<S> {
        &self.governor
    }

    /// Run one analysis for the calling client.
    ///
    /// Admission is consulted exactly once per call: a backend failure
    /// after admission degrades to the local generator without a second
    /// check, so degraded calls still cost one admission slot.
    pub async fn analyze(&self, input: &MatchInput) -> Result<MatchOutcome, ThrottledError> {
        if let AdmissionDecision::Deny(stats) = self.governor.check() {
            return Err(ThrottledError {
                remaining_requests: stats.remaining_requests,
                reset_time: stats.reset_time,
            });
        }

        let error = match tokio::time::timeout(self.deadline, self.backend.analyze(input)).await {
            Ok(Ok(report)) => {
                return Ok(MatchOutcome {
                    report,
                    source: AnalysisSource::Model,
                })
            }
            Ok(Err(err)) => err,
            Err(_) => BackendError::Timeout(self.deadline),
        };

        tracing::warn!(error = %error, "analysis backend failed, using local generator");
        Ok(MatchOutcome {
            report: self.fallback.generate(input),
            source: AnalysisSource::Local,
        })
    }
}
