//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::domain::fingerprint::ClientFingerprint;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant, used for window arithmetic.
    fn now(&self) -> Instant;

    /// Get the current wall-clock time, used for human-readable
    /// rejection timestamps.
    fn wall_now(&self) -> DateTime<Utc>;
}

/// Port for deriving the caller's fingerprint.
///
/// The governor never computes identity itself; it asks this port.
/// Infrastructure provides an environment-backed implementation
/// (EnvironmentIdentity), and tests inject a fixed one.
pub trait ClientIdentity: Send + Sync + Debug {
    /// Derive the fingerprint of the current caller.
    fn fingerprint(&self) -> ClientFingerprint;
}

/// Port for concurrent key-value storage.
///
/// This abstraction allows the application layer to store and retrieve values
/// without depending on specific concurrent data structure implementations.
/// Infrastructure provides concrete implementations (ShardedStore).
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    /// * `factory` - Function to create a new value if the key doesn't exist
    /// * `accessor` - Function that gets mutable access to the value
    ///
    /// # Returns
    /// The result from the accessor function
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Access an entry read-only, without creating it.
    ///
    /// Returns `None` if the key is absent. Observation paths use this so
    /// they never materialize records.
    fn with_entry<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&V) -> R;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Clear all entries from the storage.
    fn clear(&self);

    /// Iterate over all entries, providing access to both key and value.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);

    /// Remove entries for which the predicate returns false.
    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool;
}

/// Failure modes of a remote analysis backend.
///
/// Every variant is recoverable: the orchestrator logs it and falls back
/// to local generation.
#[cfg(feature = "async")]
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Could not reach the endpoint at all.
    #[error("network error: {0}")]
    Network(String),
    /// The request exceeded its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// The endpoint answered with a non-success status.
    #[error("{message} (status {status})")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Human-readable description of the failure class.
        message: String,
    },
    /// The endpoint answered, but the payload could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Port for a remote compatibility analysis backend.
///
/// Infrastructure provides the HTTP chat-completions adapter
/// (ModelClient); tests inject a scripted mock.
#[cfg(feature = "async")]
pub trait AnalysisBackend: Send + Sync + Debug {
    /// Run one analysis for the given input.
    fn analyze(
        &self,
        input: &crate::domain::compat::MatchInput,
    ) -> impl std::future::Future<Output = Result<crate::domain::compat::CompatibilityReport, BackendError>>
           + Send;
}
