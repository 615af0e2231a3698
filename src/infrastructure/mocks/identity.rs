//! Fixed identity provider for testing.

use crate::application::ports::ClientIdentity;
use crate::domain::fingerprint::ClientFingerprint;

/// Identity provider returning a preset fingerprint.
///
/// Lets tests pin the caller's identity, or simulate several distinct
/// clients by building one `FixedIdentity` per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIdentity {
    fingerprint: ClientFingerprint,
}

impl FixedIdentity {
    /// Create an identity that always reports `fingerprint`.
    pub fn new(fingerprint: ClientFingerprint) -> Self {
        Self { fingerprint }
    }
}

impl ClientIdentity for FixedIdentity {
    fn fingerprint(&self) -> ClientFingerprint {
        self.fingerprint
    }
}
