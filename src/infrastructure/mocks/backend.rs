//! Scripted analysis backend for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{AnalysisBackend, BackendError};
use crate::domain::compat::{CompatibilityReport, MatchInput};

/// Backend double that replays scripted responses in order.
///
/// Each call pops the next scripted response; once the script is
/// exhausted, calls fail with a malformed-response error. An optional
/// delay simulates a slow endpoint for deadline tests.
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<CompatibilityReport, BackendError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockBackend {
    /// Create an empty-scripted backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Script a successful response.
    pub fn push_ok(&self, report: CompatibilityReport) {
        self.responses
            .lock()
            .expect("MockBackend mutex poisoned - a test thread panicked while holding the lock")
            .push_back(Ok(report));
    }

    /// Script a failure.
    pub fn push_err(&self, error: BackendError) {
        self.responses
            .lock()
            .expect("MockBackend mutex poisoned - a test thread panicked while holding the lock")
            .push_back(Err(error));
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl AnalysisBackend for MockBackend {
    async fn analyze(&self, _input: &MatchInput) -> Result<CompatibilityReport, BackendError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .expect("MockBackend mutex poisoned - a test thread panicked while holding the lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(BackendError::Malformed(
                    "mock backend script exhausted".to_string(),
                ))
            })
    }
}
