use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::interpolate::VisualState;
use crate::core::shapes::TRANSLATE_X_PX;
use crate::core::types::ScrollSample;
use crate::error::{ChoreoError, ChoreoResult};
use crate::extensions::ChoreoEvent;
use crate::interaction::LoopMotion;
use crate::render::{StyleFrame, StyleWriter};
use crate::scroll::Readiness;

use super::Choreographer;

/// What one `tick_frame` did.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame_index: u64,
    /// `None` when the offset did not move and nothing requested a refresh.
    pub sample: Option<ScrollSample>,
    pub dispatched: usize,
    pub regions_evaluated: usize,
    /// Ready regions whose trigger or target is not registered.
    pub regions_skipped_missing: usize,
    /// Regions still behind a pending readiness gate.
    pub regions_waiting: usize,
    pub loops_ticked: usize,
    pub writes: usize,
}

impl<W: StyleWriter> Choreographer<W> {
    /// Runs one display frame.
    ///
    /// Steps run in a fixed order: poll gates, refresh stale trigger regions
    /// (unless a page transition is in flight), take one coalesced scroll
    /// sample and dispatch it, evaluate every ready region against that same
    /// sample, tick loops, then hand a single `StyleFrame` to the writer.
    pub fn tick_frame(&mut self, timestamp_ms: f64) -> ChoreoResult<FrameReport> {
        if !timestamp_ms.is_finite() {
            return Err(ChoreoError::InvalidData(format!(
                "frame timestamp must be finite, got {timestamp_ms}"
            )));
        }

        self.frame_index += 1;
        let mut report = FrameReport {
            frame_index: self.frame_index,
            ..FrameReport::default()
        };
        let mut events = Vec::new();

        self.poll_gates(timestamp_ms, &mut events);
        if !self.transition_in_flight {
            self.refresh_stale_regions(&mut events);
        }

        let mut frame = StyleFrame::new(self.frame_index, timestamp_ms);
        if let Some(sample) = self.source.take_frame_sample(timestamp_ms) {
            report.sample = Some(sample);
            report.dispatched = self.source.dispatch(&sample);
            events.push(ChoreoEvent::ScrollDispatched {
                offset: sample.offset,
                subscribers: report.dispatched,
            });
            self.evaluate_regions(sample.offset, &mut frame, &mut report);
        }
        report.regions_waiting = self
            .regions
            .values()
            .filter(|entry| !entry.is_ready())
            .count();

        self.tick_loops(report.sample.is_some(), &mut frame, &mut report);
        report.writes = frame.len();

        for event in events {
            self.emit(event);
        }

        if !frame.is_empty() {
            if let Err(err) = self.writer.write(&frame) {
                warn!(
                    frame = self.frame_index,
                    error = %err,
                    "style writer rejected frame"
                );
                return Err(err);
            }
            self.emit(ChoreoEvent::FrameWritten {
                frame_index: self.frame_index,
                writes: report.writes,
            });
        }

        trace!(
            frame = report.frame_index,
            dispatched = report.dispatched,
            evaluated = report.regions_evaluated,
            waiting = report.regions_waiting,
            writes = report.writes,
            "frame ticked"
        );
        Ok(report)
    }

    fn poll_gates(&mut self, timestamp_ms: f64, events: &mut Vec<ChoreoEvent>) {
        let mut resolved_any = false;
        for (id, entry) in &mut self.regions {
            if entry.is_ready() {
                continue;
            }
            let Some(gate) = entry.spec.gate.as_ref() else {
                entry.readiness = Readiness::Ready;
                continue;
            };
            let started_ms = *entry.gate_started_ms.get_or_insert(timestamp_ms);
            let readiness = gate.poll(&self.ledger, timestamp_ms - started_ms);
            if !readiness.is_resolved() {
                continue;
            }

            entry.readiness = readiness;
            if readiness == Readiness::TimedOut {
                warn!(
                    region = id.raw(),
                    waited_ms = timestamp_ms - started_ms,
                    "readiness gate timed out, initializing anyway"
                );
            } else {
                debug!(region = id.raw(), "readiness gate resolved");
            }
            events.push(ChoreoEvent::GateResolved {
                region: *id,
                readiness,
            });
            resolved_any = true;
        }
        if resolved_any {
            self.source.request_refresh();
        }
    }

    fn refresh_stale_regions(&mut self, events: &mut Vec<ChoreoEvent>) {
        let generation = self.layout_generation;
        let viewport = self.config.viewport;
        for (id, entry) in &mut self.regions {
            if !entry.is_ready() || !entry.normalizer.is_stale(generation) {
                continue;
            }
            let Some(bounds) = self.targets.get(entry.spec.trigger) else {
                continue;
            };
            match entry.normalizer.refresh(bounds, viewport, generation) {
                Ok(region) => {
                    debug!(
                        region = id.raw(),
                        start = region.start_boundary,
                        end = region.end_boundary,
                        "trigger region refreshed"
                    );
                    events.push(ChoreoEvent::RegionRefreshed {
                        region: *id,
                        start_boundary: region.start_boundary,
                        end_boundary: region.end_boundary,
                    });
                }
                Err(err) => {
                    warn!(region = id.raw(), error = %err, "trigger region refresh failed");
                }
            }
        }
    }

    fn evaluate_regions(&mut self, offset: f64, frame: &mut StyleFrame, report: &mut FrameReport) {
        for entry in self.regions.values_mut() {
            if !entry.is_ready() {
                continue;
            }
            if !self.targets.contains(entry.spec.trigger) {
                report.regions_skipped_missing += 1;
                continue;
            }
            let Some(progress) = entry.normalizer.progress(offset) else {
                report.regions_skipped_missing += 1;
                continue;
            };
            entry.last_progress = Some(progress);

            let writes_before = frame.len();
            match &entry.spec.stagger {
                Some((stagger, items)) => {
                    for (index, item) in items.iter().enumerate() {
                        if self.targets.contains(*item) {
                            let local = stagger.item_progress(index, progress);
                            frame.push(*item, entry.spec.interpolator.evaluate(local));
                        }
                    }
                }
                None => {
                    if self.targets.contains(entry.spec.target) {
                        frame.push(entry.spec.target, entry.spec.interpolator.evaluate(progress));
                    }
                }
            }

            if frame.len() == writes_before {
                report.regions_skipped_missing += 1;
            } else {
                report.regions_evaluated += 1;
            }
        }
    }

    fn tick_loops(&mut self, force_write: bool, frame: &mut StyleFrame, report: &mut FrameReport) {
        for entry in self.loops.values_mut() {
            let tick = entry.sequence.tick();
            report.loops_ticked += 1;
            if tick.motion == LoopMotion::Idle && !force_write {
                continue;
            }
            for (index, item) in entry.items.iter().take(entry.sequence.len()).enumerate() {
                if !self.targets.contains(*item) {
                    continue;
                }
                let mut state = VisualState::new();
                state.insert(TRANSLATE_X_PX, entry.sequence.item_x(index));
                frame.push(*item, state);
            }
        }
    }
}
