//! Integration tests for the analysis orchestrator.

use std::sync::Arc;
use std::time::Duration;

use astropaws::infrastructure::mocks::{FixedIdentity, MockBackend, MockClock};
use astropaws::{
    AnalysisSource, BackendError, ClientFingerprint, Clock, CompatibilityLevel,
    CompatibilityReport, Governor, MatchInput, Orchestrator, Zodiac,
};

fn sample_report() -> CompatibilityReport {
    CompatibilityReport {
        pet_zodiac: Zodiac::Aries,
        compatibility_score: 91,
        compatibility_level: CompatibilityLevel::Perfect,
        analysis: "written in the stars".into(),
        tips: vec!["play daily".into()],
        story: "a tale of two fire signs".into(),
        fun_tags: vec!["fearless little vanguard".into(), "perpetual-motion fireball".into()],
    }
}

fn input() -> MatchInput {
    MatchInput::new(Zodiac::Aries, "dog", ["brave", "active"])
}

fn build_orchestrator(
    clock: &Arc<MockClock>,
    backend: MockBackend,
) -> Orchestrator<
    astropaws::ShardedStore<ClientFingerprint, astropaws::domain::window::RequestWindow>,
    MockBackend,
> {
    let governor = Arc::new(
        Governor::builder()
            .with_max_requests(3)
            .with_window(Duration::from_secs(60))
            .with_clock(Arc::clone(clock) as Arc<dyn Clock>)
            .with_identity(Arc::new(FixedIdentity::new(ClientFingerprint::from_raw(1))))
            .build()
            .expect("valid configuration"),
    );
    Orchestrator::new(governor, backend)
}

#[tokio::test]
async fn model_reports_pass_through_untouched() {
    let clock = Arc::new(MockClock::new());
    let backend = MockBackend::new();
    backend.push_ok(sample_report());
    let orchestrator = build_orchestrator(&clock, backend);

    let outcome = orchestrator.analyze(&input()).await.expect("admitted");
    assert_eq!(outcome.source, AnalysisSource::Model);
    assert_eq!(outcome.report.analysis, "written in the stars");
    assert_eq!(outcome.report.compatibility_score, 91);
}

#[tokio::test]
async fn degraded_calls_still_count_toward_the_limit() {
    let clock = Arc::new(MockClock::new());
    let backend = MockBackend::new();
    for _ in 0..3 {
        backend.push_err(BackendError::Network("connection reset".into()));
    }
    let orchestrator = build_orchestrator(&clock, backend);

    // Three degraded analyses exhaust the allowance of three.
    for _ in 0..3 {
        let outcome = orchestrator.analyze(&input()).await.expect("admitted");
        assert_eq!(outcome.source, AnalysisSource::Local);
    }

    let err = orchestrator.analyze(&input()).await.expect_err("throttled");
    assert_eq!(err.remaining_requests, 0);
    assert_eq!(err.wait_hint(clock.now()), Duration::from_secs(60));
}

#[tokio::test]
async fn throttled_calls_skip_the_backend_entirely() {
    let clock = Arc::new(MockClock::new());
    let backend = MockBackend::new();
    for _ in 0..3 {
        backend.push_ok(sample_report());
    }
    let orchestrator = build_orchestrator(&clock, backend);

    for _ in 0..3 {
        assert!(orchestrator.analyze(&input()).await.is_ok());
    }
    assert!(orchestrator.analyze(&input()).await.is_err());

    // The governor rejected before the backend was consulted.
    assert_eq!(orchestrator.governor().metrics().requests_rejected, 1);

    // After the window rolls over the backend is reachable again.
    clock.advance(Duration::from_secs(61));
    let backend_error = orchestrator.analyze(&input()).await.expect("admitted");
    // Script exhausted: the mock fails, and the local generator answers.
    assert_eq!(backend_error.source, AnalysisSource::Local);
}

#[tokio::test]
async fn local_reports_share_the_model_report_shape() {
    let clock = Arc::new(MockClock::new());
    let backend = MockBackend::new();
    backend.push_err(BackendError::Status {
        status: 500,
        message: "model service temporarily unavailable".into(),
    });
    let orchestrator = build_orchestrator(&clock, backend);

    let outcome = orchestrator.analyze(&input()).await.expect("admitted");
    assert_eq!(outcome.source, AnalysisSource::Local);

    let report = outcome.report;
    assert!(report.compatibility_score <= 100);
    assert_eq!(
        report.compatibility_level,
        CompatibilityLevel::from_score(report.compatibility_score)
    );
    assert!(!report.analysis.is_empty());
    assert!(!report.story.is_empty());
    assert!(!report.tips.is_empty());
    assert!((2..=3).contains(&report.fun_tags.len()));
}

#[tokio::test(start_paused = true)]
async fn deadline_overruns_degrade_instead_of_hanging() {
    let clock = Arc::new(MockClock::new());
    let backend = MockBackend::new().with_delay(Duration::from_secs(300));
    backend.push_ok(sample_report());
    let orchestrator =
        build_orchestrator(&clock, backend).with_deadline(Duration::from_secs(60));

    let outcome = orchestrator.analyze(&input()).await.expect("admitted");
    assert_eq!(outcome.source, AnalysisSource::Local);
    assert_eq!(orchestrator.governor().client_stats().request_count, 1);
}
