//! Mock clock for testing.

use crate::application::ports::Clock;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Mock clock for testing.
///
/// Allows tests to control time progression explicitly, enabling
/// deterministic testing of window arithmetic. The monotonic and wall
/// clocks advance together.
///
/// # Examples
///
/// ```
/// use astropaws::infrastructure::mocks::MockClock;
/// use astropaws::application::ports::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::new();
/// let start = clock.now();
///
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now(), start + Duration::from_secs(10));
/// ```
///
/// # Thread Safety
///
/// `MockClock` is thread-safe and can be cloned to share across threads.
/// All clones share the same underlying time value, so advancing time in
/// one clone affects all clones.
#[derive(Debug, Clone)]
pub struct MockClock {
    state: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    instant: Instant,
    wall: DateTime<Utc>,
}

impl MockClock {
    /// Create a mock clock starting now, with a fixed wall-clock epoch.
    pub fn new() -> Self {
        // An arbitrary but stable wall time keeps rejection timestamps
        // reproducible across test runs.
        let wall = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::starting_at(Instant::now(), wall)
    }

    /// Create a mock clock at an explicit starting point.
    pub fn starting_at(instant: Instant, wall: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State { instant, wall })),
        }
    }

    /// Advance both clocks by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        state.instant += duration;
        state.wall += chrono::Duration::from_std(duration)
            .expect("duration too large for the mock wall clock");
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.state
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
            .instant
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.state
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
            .wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        let start = clock.now();
        let wall_start = clock.wall_now();

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));
        assert_eq!(clock.wall_now(), wall_start + chrono::Duration::seconds(10));
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::new();
        let start = clock.now();
        let clone = clock.clone();

        clone.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), start + Duration::from_secs(5));
    }
}
