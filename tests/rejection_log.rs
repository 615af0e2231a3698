//! Integration tests for the bounded rejection log.

use std::sync::Arc;
use std::time::Duration;

use astropaws::infrastructure::mocks::{FixedIdentity, MockClock};
use astropaws::{ClientFingerprint, Clock, Governor};

fn throttled_governor(
    clock: &Arc<MockClock>,
) -> Governor<astropaws::ShardedStore<ClientFingerprint, astropaws::domain::window::RequestWindow>>
{
    Governor::builder()
        .with_max_requests(1)
        .with_window(Duration::from_secs(3600))
        .with_clock(Arc::clone(clock) as Arc<dyn Clock>)
        .with_identity(Arc::new(FixedIdentity::new(ClientFingerprint::from_raw(1))))
        .build()
        .expect("valid configuration")
}

#[test]
fn every_denial_is_logged_with_its_configuration() {
    let clock = Arc::new(MockClock::new());
    let governor = throttled_governor(&clock);

    assert!(governor.is_allowed());
    assert!(!governor.is_allowed());
    assert!(!governor.is_allowed());

    assert_eq!(governor.rejection_count(), 2);
    let entries = governor.recent_rejections(50);
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.fingerprint, ClientFingerprint::from_raw(1));
        assert_eq!(entry.limit, 1);
        assert_eq!(entry.window, Duration::from_secs(3600));
        assert_eq!(entry.reason, "Rate limit exceeded");
    }
}

#[test]
fn entries_carry_ordered_wall_timestamps() {
    let clock = Arc::new(MockClock::new());
    let governor = throttled_governor(&clock);

    assert!(governor.is_allowed());
    assert!(!governor.is_allowed());
    clock.advance(Duration::from_secs(5));
    assert!(!governor.is_allowed());

    let entries = governor.recent_rejections(50);
    assert_eq!(entries.len(), 2);
    assert!(entries[0].recorded_at < entries[1].recorded_at);
    // RFC 3339 rendering, usable directly in diagnostics.
    assert!(entries[0].iso_date().starts_with("2024-01-01T"));
}

#[test]
fn query_returns_the_newest_entries_oldest_first() {
    let clock = Arc::new(MockClock::new());
    let governor = throttled_governor(&clock);

    assert!(governor.is_allowed());
    for _ in 0..10 {
        clock.advance(Duration::from_secs(1));
        assert!(!governor.is_allowed());
    }

    let entries = governor.recent_rejections(3);
    assert_eq!(entries.len(), 3);
    assert!(entries[0].recorded_at < entries[1].recorded_at);
    assert!(entries[1].recorded_at < entries[2].recorded_at);

    // The returned slice is the tail of the log.
    let all = governor.recent_rejections(50);
    assert_eq!(entries[2].recorded_at, all[9].recorded_at);
}

#[test]
fn log_holds_a_thousand_entries_then_truncates_to_the_newest_five_hundred() {
    let clock = Arc::new(MockClock::new());
    let governor = throttled_governor(&clock);

    assert!(governor.is_allowed());
    // Exactly 1000 denials fill the log without truncation.
    for _ in 0..1000 {
        clock.advance(Duration::from_secs(1));
        assert!(!governor.is_allowed());
    }
    assert_eq!(governor.rejection_count(), 1000);

    // The 1001st denial trips the overflow: only the newest 500 remain.
    clock.advance(Duration::from_secs(1));
    assert!(!governor.is_allowed());
    assert_eq!(governor.rejection_count(), 500);

    // The survivors are the most recent entries, the last one being the
    // denial that caused the overflow.
    let survivors = governor.recent_rejections(500);
    assert_eq!(survivors.len(), 500);
    assert!(survivors.windows(2).all(|w| w[0].recorded_at < w[1].recorded_at));

    let newest = &survivors[499];
    let oldest = &survivors[0];
    assert_eq!(
        newest.recorded_at - oldest.recorded_at,
        chrono::Duration::seconds(499)
    );
}
