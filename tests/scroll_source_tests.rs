use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use scroll_choreo::ChoreoError;
use scroll_choreo::core::ScrollSample;
use scroll_choreo::scroll::{ScrollMode, ScrollSource};

fn recording_subscriber(source: &mut ScrollSource) -> Rc<RefCell<Vec<f64>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    source.subscribe(move |sample: &ScrollSample| sink.borrow_mut().push(sample.offset));
    seen
}

fn run_frame(source: &mut ScrollSource, timestamp_ms: f64) -> usize {
    match source.take_frame_sample(timestamp_ms) {
        Some(sample) => source.dispatch(&sample),
        None => 0,
    }
}

#[test]
fn burst_of_events_reaches_subscribers_once_per_frame() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    let seen = recording_subscriber(&mut source);

    for step in 1..=12 {
        source
            .push_scroll_event(f64::from(step) * 10.0, f64::from(step))
            .expect("event");
    }
    assert_eq!(run_frame(&mut source, 16.0), 1);
    assert_eq!(*seen.borrow(), vec![120.0]);
    assert_eq!(source.coalesced_events(), 12);

    // Nothing moved: no dispatch.
    assert_eq!(run_frame(&mut source, 32.0), 0);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn first_frame_dispatches_the_initial_offset() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    let seen = recording_subscriber(&mut source);
    assert_eq!(run_frame(&mut source, 0.0), 1);
    assert_eq!(*seen.borrow(), vec![0.0]);
}

#[test]
fn refresh_request_redispatches_unchanged_offset() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    let seen = recording_subscriber(&mut source);
    source.push_scroll_event(400.0, 0.0).expect("event");
    run_frame(&mut source, 16.0);

    source.request_refresh();
    assert_eq!(run_frame(&mut source, 32.0), 1);
    assert_eq!(*seen.borrow(), vec![400.0, 400.0]);
    assert_eq!(source.coalesced_events(), 0);
}

#[test]
fn returning_to_the_same_offset_within_a_frame_is_not_a_move() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    source.push_scroll_event(200.0, 0.0).expect("event");
    source.take_frame_sample(16.0).expect("moved");

    source.push_scroll_event(260.0, 20.0).expect("event");
    source.push_scroll_event(200.0, 24.0).expect("event");
    assert!(source.take_frame_sample(32.0).is_none());
}

#[test]
fn velocity_uses_the_last_two_samples() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    source.push_scroll_event(100.0, 0.0).expect("event");
    source.take_frame_sample(16.0).expect("moved");
    source.push_scroll_event(260.0, 30.0).expect("event");
    source.take_frame_sample(32.0).expect("moved");
    assert_abs_diff_eq!(source.velocity_px_per_ms(), 10.0);

    source.push_scroll_event(100.0, 40.0).expect("event");
    source.take_frame_sample(48.0).expect("moved");
    assert_abs_diff_eq!(source.velocity_px_per_ms(), -10.0);
}

#[test]
fn unsubscribed_callbacks_stop_running() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    let kept = recording_subscriber(&mut source);
    let dropped = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&dropped);
    let id = source.subscribe(move |_| *counter.borrow_mut() += 1);
    assert_eq!(source.subscriber_count(), 2);

    run_frame(&mut source, 0.0);
    source.unsubscribe(id).expect("registered");
    source.push_scroll_event(50.0, 10.0).expect("event");
    run_frame(&mut source, 16.0);

    assert_eq!(*dropped.borrow(), 1);
    assert_eq!(*kept.borrow(), vec![0.0, 50.0]);
    assert!(matches!(
        source.unsubscribe(id),
        Err(ChoreoError::UnknownHandle { .. })
    ));
}

#[test]
fn smoothed_source_lags_behind_native_events() {
    let mut source = ScrollSource::new(ScrollMode::smoothed()).expect("source");
    source.push_scroll_event(1_000.0, 0.0).expect("event");
    assert_eq!(source.target_offset(), 1_000.0);
    assert!(!source.is_settled());

    let mut previous = 0.0;
    let mut frames = 0;
    while let Some(sample) = source.take_frame_sample(f64::from(frames) * 16.0) {
        assert!(sample.offset > previous || frames == 0);
        assert!(sample.offset <= 1_000.0);
        previous = sample.offset;
        frames += 1;
        assert!(frames < 500, "smoothing never settled");
    }
    assert!(source.is_settled());
    assert_eq!(source.current_offset(), 1_000.0);
}

#[test]
fn reset_drops_subscribers_and_offset() {
    let mut source = ScrollSource::new(ScrollMode::Native).expect("source");
    recording_subscriber(&mut source);
    source.push_scroll_event(75.0, 0.0).expect("event");
    run_frame(&mut source, 16.0);

    source.reset();
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(source.current_offset(), 0.0);
    assert_eq!(source.last_sample(), None);
}
