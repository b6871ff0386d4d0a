use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use scroll_choreo::core::{
    EdgeAnchor, ElementBounds, Progress, ProgressNormalizer, TriggerEdge, TriggerRegion,
    TriggerRule, Viewport, compute_progress,
};

#[test]
fn fixed_region_maps_offsets_linearly() {
    let region = TriggerRegion::new(1_000.0, 2_000.0).expect("valid region");

    assert_eq!(compute_progress(500.0, region), Progress::START);
    assert_abs_diff_eq!(compute_progress(1_500.0, region).value(), 0.5);
    assert_eq!(compute_progress(2_500.0, region), Progress::END);
}

#[test]
fn far_out_of_range_offsets_clamp() {
    let region = TriggerRegion::new(1_000.0, 2_000.0).expect("valid region");
    assert_eq!(compute_progress(1_000.0 - 10_000.0, region).value(), 0.0);
    assert_eq!(compute_progress(2_000.0 + 10_000.0, region).value(), 1.0);
}

#[test]
fn zero_length_and_reversed_regions_are_neutral() {
    for region in [
        TriggerRegion::new(800.0, 800.0).expect("zero length"),
        TriggerRegion::new(900.0, 100.0).expect("reversed"),
    ] {
        assert!(region.is_degenerate());
        for offset in [-1e9, 0.0, 800.0, 1e9] {
            let progress = compute_progress(offset, region);
            assert_eq!(progress, Progress::START);
            assert!(!progress.value().is_nan());
        }
    }
}

#[test]
fn non_finite_inputs_never_produce_nan() {
    let region = TriggerRegion::new(0.0, 100.0).expect("valid region");
    assert_eq!(compute_progress(f64::NAN, region), Progress::START);
    assert_eq!(compute_progress(f64::INFINITY, region), Progress::END);
    assert_eq!(compute_progress(f64::NEG_INFINITY, region), Progress::START);
    assert_eq!(compute_progress(f64::MAX, region), Progress::END);
    assert!(TriggerRegion::new(f64::NAN, 1.0).is_err());
}

#[test]
fn top_to_center_rule_uses_half_viewport() {
    let region = TriggerRule::top_to_center()
        .resolve(ElementBounds::new(3_000.0, 500.0), Viewport::new(1024, 1000))
        .expect("resolve");
    assert_eq!(region.start_boundary, 2_000.0);
    assert_eq!(region.end_boundary, 2_500.0);
}

#[test]
fn anchored_edge_offsets_and_fractions_apply() {
    let rule = TriggerRule::new(
        TriggerEdge::Anchored {
            element: EdgeAnchor::Fraction(0.25),
            viewport: EdgeAnchor::Bottom,
            offset_px: 40.0,
        },
        TriggerEdge::Absolute(5_000.0),
    );
    let region = rule
        .resolve(ElementBounds::new(1_000.0, 400.0), Viewport::new(800, 600))
        .expect("resolve");
    assert_eq!(region.start_boundary, 1_000.0 + 100.0 - 600.0 + 40.0);
    assert_eq!(region.end_boundary, 5_000.0);
}

#[test]
fn resolve_rejects_invalid_geometry() {
    let rule = TriggerRule::enter_to_exit();
    assert!(
        rule.resolve(ElementBounds::new(0.0, -1.0), Viewport::new(800, 600))
            .is_err()
    );
    assert!(
        rule.resolve(ElementBounds::new(0.0, 100.0), Viewport::new(0, 600))
            .is_err()
    );
}

#[test]
fn normalizer_waits_for_first_measurement_and_tracks_generation() {
    let mut normalizer = ProgressNormalizer::new(TriggerRule::pinned(1.0));
    assert_eq!(normalizer.progress(100.0), None);
    assert!(normalizer.is_stale(0));

    let viewport = Viewport::new(1280, 800);
    normalizer
        .refresh(ElementBounds::new(1_000.0, 800.0), viewport, 1)
        .expect("refresh");
    assert!(!normalizer.is_stale(1));
    assert!(normalizer.is_stale(2));
    assert_abs_diff_eq!(
        normalizer.progress(1_400.0).expect("measured").value(),
        0.5
    );

    // Layout moved the element down; stale boundaries would report 1.0 here.
    normalizer
        .refresh(ElementBounds::new(1_600.0, 800.0), viewport, 2)
        .expect("refresh");
    assert_abs_diff_eq!(
        normalizer.progress(2_000.0).expect("measured").value(),
        0.5
    );

    normalizer.invalidate();
    assert!(normalizer.is_stale(2));
    assert!(normalizer.progress(2_000.0).is_some());
}

proptest! {
    #[test]
    fn progress_is_monotonic_in_offset(
        start in -50_000.0f64..50_000.0,
        length in 0.0f64..20_000.0,
        a in -100_000.0f64..100_000.0,
        b in -100_000.0f64..100_000.0,
    ) {
        let region = TriggerRegion::new(start, start + length).expect("finite region");
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(compute_progress(low, region) <= compute_progress(high, region));
    }

    #[test]
    fn progress_stays_in_unit_interval(
        start in -1e12f64..1e12,
        end in -1e12f64..1e12,
        offset in -1e15f64..1e15,
    ) {
        let region = TriggerRegion::new(start, end).expect("finite region");
        let value = compute_progress(offset, region).value();
        prop_assert!((0.0..=1.0).contains(&value));
    }
}
