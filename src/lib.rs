//! # astropaws
//!
//! Pet-and-owner zodiac compatibility analysis with client-side request
//! throttling.
//!
//! The crate has two halves. The [`Governor`] is a sliding-window
//! admission controller: it tracks recent requests per client
//! fingerprint, denies requests over the limit, and keeps a bounded
//! log of every rejection. The [`Orchestrator`] sits on top of it and
//! produces compatibility reports, preferring a remote chat-completions
//! model and degrading to a local generator whenever the model path
//! fails.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use astropaws::Governor;
//! use std::time::Duration;
//!
//! // Sensible defaults: 5 requests per 60-second window
//! let governor = Governor::builder().build().unwrap();
//!
//! // Or customize:
//! let governor = Governor::builder()
//!     .with_max_requests(10)
//!     .with_window(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! if governor.is_allowed() {
//!     // proceed with the request
//! } else {
//!     let stats = governor.client_stats();
//!     println!("throttled; {} requests remaining", stats.remaining_requests);
//! }
//! ```
//!
//! Running analyses end to end (requires the `http` feature, enabled
//! by default):
//!
//! ```rust,no_run
//! # #[cfg(feature = "http")]
//! # async fn run() {
//! use astropaws::{
//!     Governor, MatchInput, ModelClient, ModelClientConfig, Orchestrator, Zodiac,
//! };
//! use std::sync::Arc;
//!
//! let governor = Arc::new(Governor::builder().build().unwrap());
//! governor.start_cleanup();
//!
//! let backend = ModelClient::new(ModelClientConfig {
//!     api_key: Some("sk-...".to_string()),
//!     ..ModelClientConfig::default()
//! });
//! let orchestrator = Orchestrator::new(governor, backend);
//!
//! let input = MatchInput::new(Zodiac::Gemini, "cat", ["curious", "clingy"]);
//! match orchestrator.analyze(&input).await {
//!     Ok(outcome) => println!("{}: {}", outcome.report.compatibility_score, outcome.report.analysis),
//!     Err(throttled) => println!("{throttled}"),
//! }
//! # }
//! ```
//!
//! ## Admission Model
//!
//! Each client is identified by a fingerprint hashed from its
//! environment profile. Admission uses a sliding window: a request is
//! admitted while fewer than `max_requests` admitted timestamps fall
//! inside the trailing window, and denied requests are never counted.
//! Denials are appended to a bounded rejection log (1000 entries,
//! truncated to the newest 500 on overflow) for later inspection.
//!
//! ## Degradation
//!
//! The orchestrator consults the governor exactly once per analysis.
//! After admission, any backend failure (network, timeout, HTTP error
//! status, malformed payload) is logged and answered by the local
//! generator, which produces reports with the same shape as the model
//! path. Only throttling is surfaced as an error.
//!
//! ## Features
//!
//! - `http` (default): the reqwest-based [`ModelClient`] backend
//! - `async`: the orchestrator and the periodic cleanup task (implied
//!   by `http`)
//! - `test-helpers`: controllable mocks for clock, identity and backend
//!
//! ## Memory
//!
//! Per tracked client the governor stores at most `max_requests`
//! timestamps plus a creation instant. Stale clients are swept by
//! [`Governor::cleanup`], either called manually or on a schedule via
//! `start_cleanup`. The rejection log is bounded by construction.
//!
//! [`Governor`]: application::governor::Governor
//! [`Orchestrator`]: application::orchestrator::Orchestrator
//! [`ModelClient`]: infrastructure::model_client::ModelClient

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    compat::{CompatibilityLevel, CompatibilityReport, MatchInput, Zodiac},
    fallback::FallbackGenerator,
    fingerprint::{ClientFingerprint, EnvironmentProfile},
    rejection::RejectionLogEntry,
};

pub use application::{
    governor::{
        AdmissionDecision, BuildError, ClientStats, Governor, GovernorBuilder, GovernorConfig,
    },
    metrics::{Metrics, MetricsSnapshot},
    ports::{ClientIdentity, Clock, Storage},
};

#[cfg(feature = "async")]
pub use application::{
    orchestrator::{AnalysisSource, MatchOutcome, Orchestrator, ThrottledError},
    ports::{AnalysisBackend, BackendError},
};

pub use infrastructure::{
    clock::SystemClock, identity::EnvironmentIdentity, storage::ShardedStore,
};

#[cfg(feature = "http")]
pub use infrastructure::model_client::{ModelClient, ModelClientConfig};
