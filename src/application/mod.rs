//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages the runtime behavior:
//! - Admission governor (per-client throttling decisions)
//! - Orchestrator (backend analysis with local fallback)
//! - Metrics (admission counters)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod governor;
pub mod metrics;
#[cfg(feature = "async")]
pub mod orchestrator;
pub mod ports;
