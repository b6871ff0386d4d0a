use scroll_choreo::scroll::{Gate, Readiness, ReadinessLedger, ReadinessSignal};

#[test]
fn signal_gate_resolves_once_recorded() {
    let gate = Gate::fonts();
    let mut ledger = ReadinessLedger::new();
    assert_eq!(gate.poll(&ledger, 10_000.0), Readiness::Pending);
    ledger.record(ReadinessSignal::FontsReady);
    assert_eq!(gate.poll(&ledger, 0.0), Readiness::Ready);
}

#[test]
fn any_resolves_on_the_first_condition() {
    let gate = Gate::any([
        Gate::signal(ReadinessSignal::TransitionComplete),
        Gate::images(3),
    ]);
    let mut ledger = ReadinessLedger::new();
    ledger.record(ReadinessSignal::ImageLoaded);
    assert_eq!(gate.poll(&ledger, 0.0), Readiness::Pending);
    ledger.record(ReadinessSignal::TransitionComplete);
    assert_eq!(gate.poll(&ledger, 0.0), Readiness::Ready);
}

#[test]
fn empty_compositions_have_fixed_outcomes() {
    let ledger = ReadinessLedger::new();
    assert_eq!(Gate::all([]).poll(&ledger, 0.0), Readiness::Ready);
    assert_eq!(Gate::any([]).poll(&ledger, 1e9), Readiness::Pending);
    assert_eq!(
        Gate::any([]).with_timeout(100.0).poll(&ledger, 100.0),
        Readiness::TimedOut
    );
}

#[test]
fn nested_timeout_is_reported_through_all() {
    let gate = Gate::all([
        Gate::fonts(),
        Gate::images(2).with_timeout(250.0),
    ]);
    let mut ledger = ReadinessLedger::new();
    ledger.record(ReadinessSignal::FontsReady);
    assert_eq!(gate.poll(&ledger, 100.0), Readiness::Pending);
    assert_eq!(gate.poll(&ledger, 250.0), Readiness::TimedOut);

    ledger.record(ReadinessSignal::ImageLoaded);
    ledger.record(ReadinessSignal::ImageLoaded);
    assert_eq!(gate.poll(&ledger, 250.0), Readiness::Ready);
}

#[test]
fn ready_beats_an_expired_timeout() {
    let gate = Gate::fonts().with_timeout(50.0);
    let mut ledger = ReadinessLedger::new();
    ledger.record(ReadinessSignal::FontsReady);
    assert_eq!(gate.poll(&ledger, 5_000.0), Readiness::Ready);
}

#[test]
fn bounded_only_wraps_unbounded_roots() {
    let bounded = Gate::fonts().bounded(3_000.0);
    assert!(bounded.has_timeout());
    assert_eq!(
        bounded,
        Gate::Timeout {
            inner: Box::new(Gate::fonts()),
            after_ms: 3_000.0
        }
    );

    let explicit = Gate::fonts().with_timeout(10.0).bounded(3_000.0);
    assert_eq!(explicit, Gate::fonts().with_timeout(10.0));
}

#[test]
fn invalid_timeouts_fail_validation_at_any_depth() {
    assert!(Gate::fonts().with_timeout(f64::NAN).validate().is_err());
    assert!(
        Gate::all([Gate::any([Gate::images(1).with_timeout(-1.0)])])
            .validate()
            .is_err()
    );
    assert!(Gate::all([Gate::fonts(), Gate::images(0)]).validate().is_ok());
}

#[test]
fn gates_round_trip_through_json() {
    let gate = Gate::all([Gate::fonts(), Gate::images(4)]).with_timeout(1_500.0);
    let json = serde_json::to_string(&gate).expect("serialize");
    let parsed: Gate = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, gate);

    let authored: Gate =
        serde_json::from_str(r#"{ "any": [ { "signal": "fonts_ready" }, { "images": { "expected": 2 } } ] }"#)
            .expect("authored gate");
    assert_eq!(
        authored,
        Gate::any([Gate::fonts(), Gate::images(2)])
    );
}

#[test]
fn cleared_transition_signal_makes_gate_pending_again() {
    let gate = Gate::signal(ReadinessSignal::TransitionComplete);
    let mut ledger = ReadinessLedger::new();
    ledger.record(ReadinessSignal::TransitionComplete);
    assert!(gate.poll(&ledger, 0.0).is_resolved());
    ledger.clear(ReadinessSignal::TransitionComplete);
    assert!(!gate.poll(&ledger, 0.0).is_resolved());
}
