//! Client identity derived from the process environment.

use crate::application::ports::ClientIdentity;
use crate::domain::fingerprint::{ClientFingerprint, EnvironmentProfile};

/// Identity provider fingerprinting the host process environment.
///
/// The profile is sampled once at construction and the fingerprint
/// cached, so the same process keeps the same identity for its
/// lifetime. Two processes with matching environments share a
/// fingerprint, which matches what the admission bound wants.
#[derive(Debug, Clone)]
pub struct EnvironmentIdentity {
    fingerprint: ClientFingerprint,
}

impl EnvironmentIdentity {
    /// Sample the environment and derive the fingerprint.
    pub fn new() -> Self {
        Self {
            fingerprint: ClientFingerprint::from_profile(&Self::sample_profile()),
        }
    }

    /// The environment attributes hashed into the fingerprint.
    pub fn sample_profile() -> EnvironmentProfile {
        let agent = std::env::var("ASTROPAWS_AGENT")
            .unwrap_or_else(|_| format!("astropaws/{}", env!("CARGO_PKG_VERSION")));
        let locale = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "en-US".to_string());
        let timezone_offset_minutes = chrono::Local::now().offset().local_minus_utc() / 60;

        EnvironmentProfile {
            agent,
            locale,
            // No display attached to a process; fixed dimensions keep the
            // profile shape uniform across identity sources.
            screen_width: 0,
            screen_height: 0,
            timezone_offset_minutes,
            platform: std::env::consts::OS.to_string(),
        }
    }
}

impl Default for EnvironmentIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientIdentity for EnvironmentIdentity {
    fn fingerprint(&self) -> ClientFingerprint {
        self.fingerprint
    }
}
