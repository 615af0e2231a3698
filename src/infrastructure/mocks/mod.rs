//! Mock implementations for testing.
//!
//! This module provides test doubles for infrastructure adapters,
//! enabling controlled testing of application logic.

#[cfg(feature = "async")]
pub mod backend;
pub mod clock;
pub mod identity;

#[cfg(feature = "async")]
pub use backend::MockBackend;
pub use clock::MockClock;
pub use identity::FixedIdentity;
