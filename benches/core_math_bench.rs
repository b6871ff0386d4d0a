use criterion::{Criterion, criterion_group, criterion_main};
use scroll_choreo::api::{Choreographer, ChoreographerConfig, RegionSpec};
use scroll_choreo::core::shapes::{circular_mask_reveal, pinned_stack};
use scroll_choreo::core::{ElementBounds, Progress, TargetId, TriggerRegion, Viewport, compute_progress};
use scroll_choreo::interaction::SeamlessLoop;
use scroll_choreo::render::RecordingWriter;
use std::hint::black_box;

fn bench_compute_progress(c: &mut Criterion) {
    let region = TriggerRegion::new(1_000.0, 2_000.0).expect("valid region");

    c.bench_function("compute_progress", |b| {
        b.iter(|| compute_progress(black_box(1_432.5), black_box(region)))
    });
}

fn bench_phase_evaluate(c: &mut Criterion) {
    let stack = pinned_stack().expect("valid shape");

    c.bench_function("pinned_stack_evaluate", |b| {
        b.iter(|| stack.evaluate(black_box(Progress::new(0.61))))
    });
}

fn bench_loop_nearest_64(c: &mut Criterion) {
    let widths: Vec<f64> = (0..64).map(|i| 180.0 + f64::from(i % 5) * 20.0).collect();
    let mut sequence = SeamlessLoop::new(widths, 24.0).expect("valid loop");
    sequence.begin_drag();
    sequence.drag_by(-5_321.0);

    c.bench_function("loop_nearest_64", |b| {
        b.iter(|| black_box(&sequence).nearest_index())
    });
}

fn bench_tick_frame_100_regions(c: &mut Criterion) {
    let config = ChoreographerConfig::new(Viewport::new(1440, 900));
    let mut choreo = Choreographer::new(RecordingWriter::default(), config).expect("init");
    for i in 0..100_u32 {
        let target = TargetId::new(u64::from(i));
        choreo
            .set_target_bounds(target, ElementBounds::new(f64::from(i) * 900.0, 900.0))
            .expect("bounds");
        let interpolator = circular_mask_reveal().expect("valid shape");
        choreo
            .add_region(RegionSpec::new(target, interpolator))
            .expect("region");
    }

    let mut offset = 0.0;
    let mut timestamp = 0.0;
    c.bench_function("tick_frame_100_regions", |b| {
        b.iter(|| {
            offset += 7.0;
            timestamp += 16.0;
            choreo.on_scroll(offset, timestamp).expect("scroll");
            choreo.tick_frame(timestamp).expect("tick")
        })
    });
}

criterion_group!(
    benches,
    bench_compute_progress,
    bench_phase_evaluate,
    bench_loop_nearest_64,
    bench_tick_frame_100_regions
);
criterion_main!(benches);
