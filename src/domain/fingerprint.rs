//! Client fingerprint computation.
//!
//! A fingerprint identifies a logical client session based on attributes
//! that stay stable for the lifetime of the session: agent string, locale,
//! screen resolution, timezone offset, and platform. It is an anti-burst
//! key, not an identity: collisions between distinct real users are
//! possible and acceptable.

use ahash::AHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An opaque key identifying a client session.
///
/// Identical environment profiles always produce identical fingerprints
/// within the same process lifetime. The value is not cryptographically
/// strong and must never be used for authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientFingerprint(u64);

impl ClientFingerprint {
    /// Compute a fingerprint from an environment profile.
    pub fn from_profile(profile: &EnvironmentProfile) -> Self {
        let mut hasher = AHasher::default();

        profile.agent.hash(&mut hasher);
        profile.locale.hash(&mut hasher);
        profile.screen_width.hash(&mut hasher);
        profile.screen_height.hash(&mut hasher);
        profile.timezone_offset_minutes.hash(&mut hasher);
        profile.platform.hash(&mut hasher);

        ClientFingerprint(hasher.finish())
    }

    /// Build a fingerprint from a raw hash value.
    ///
    /// Mainly useful for tests that need distinct, predictable keys.
    pub fn from_raw(raw: u64) -> Self {
        ClientFingerprint(raw)
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The attribute tuple a fingerprint is derived from.
///
/// All fields are stable for the duration of a session; none of them is
/// secret or verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    /// Agent string (browser user agent, CLI name/version, ...).
    pub agent: String,
    /// BCP 47 locale tag, e.g. "en-US".
    pub locale: String,
    /// Screen width in pixels (0 when headless).
    pub screen_width: u32,
    /// Screen height in pixels (0 when headless).
    pub screen_height: u32,
    /// Offset from UTC in minutes.
    pub timezone_offset_minutes: i32,
    /// Platform identifier, e.g. "linux-x86_64".
    pub platform: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> EnvironmentProfile {
        EnvironmentProfile {
            agent: "astropaws-test/1.0".to_string(),
            locale: "en-US".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            timezone_offset_minutes: -120,
            platform: "linux-x86_64".to_string(),
        }
    }

    #[test]
    fn identical_profiles_produce_identical_fingerprints() {
        let a = ClientFingerprint::from_profile(&profile());
        let b = ClientFingerprint::from_profile(&profile());

        assert_eq!(a, b);
    }

    #[test]
    fn changed_attribute_changes_fingerprint() {
        let base = ClientFingerprint::from_profile(&profile());

        let mut other = profile();
        other.locale = "de-DE".to_string();
        assert_ne!(base, ClientFingerprint::from_profile(&other));

        let mut other = profile();
        other.screen_width = 1280;
        assert_ne!(base, ClientFingerprint::from_profile(&other));

        let mut other = profile();
        other.timezone_offset_minutes = 0;
        assert_ne!(base, ClientFingerprint::from_profile(&other));
    }

    #[test]
    fn display_is_sixteen_hex_digits() {
        let fp = ClientFingerprint::from_profile(&profile());
        let display = format!("{}", fp);

        assert_eq!(display.len(), 16);
        assert!(display.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn from_raw_roundtrip() {
        let fp = ClientFingerprint::from_raw(0xdead_beef);
        assert_eq!(fp.as_u64(), 0xdead_beef);
    }
}
