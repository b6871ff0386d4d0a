use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::types::{ScrollSample, SubscriptionId};
use crate::error::{ChoreoError, ChoreoResult};
use crate::scroll::FrameScheduler;

/// How native scroll events become the per-frame offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScrollMode {
    /// The offset is the latest native event.
    #[default]
    Native,
    /// Native events set a target and the offset glides toward it every frame.
    Smoothed { lerp: f64, snap_threshold_px: f64 },
}

impl ScrollMode {
    #[must_use]
    pub fn smoothed() -> Self {
        Self::Smoothed {
            lerp: 0.1,
            snap_threshold_px: 0.5,
        }
    }

    pub fn validate(self) -> ChoreoResult<()> {
        if let Self::Smoothed {
            lerp,
            snap_threshold_px,
        } = self
        {
            if !lerp.is_finite() || lerp <= 0.0 || lerp > 1.0 {
                return Err(ChoreoError::InvalidData(format!(
                    "smooth scroll lerp must be in (0, 1], got {lerp}"
                )));
            }
            if !snap_threshold_px.is_finite() || snap_threshold_px <= 0.0 {
                return Err(ChoreoError::InvalidData(format!(
                    "smooth scroll snap threshold must be finite and > 0, got {snap_threshold_px}"
                )));
            }
        }
        Ok(())
    }
}

/// Sole writer of the scroll offset.
///
/// Native events may arrive many times per frame. They only update internal
/// state; subscribers see at most one sample per frame, carrying the latest
/// offset.
#[derive(Debug)]
pub struct ScrollSource {
    mode: ScrollMode,
    offset: f64,
    target: f64,
    pending_events: usize,
    coalesced_events: usize,
    force_refresh: bool,
    previous: Option<ScrollSample>,
    last: Option<ScrollSample>,
    subscribers: FrameScheduler<ScrollSample>,
}

impl ScrollSource {
    pub fn new(mode: ScrollMode) -> ChoreoResult<Self> {
        mode.validate()?;
        Ok(Self {
            mode,
            offset: 0.0,
            target: 0.0,
            pending_events: 0,
            coalesced_events: 0,
            force_refresh: false,
            previous: None,
            last: None,
            subscribers: FrameScheduler::new(),
        })
    }

    #[must_use]
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// Records a native scroll event. Nothing is dispatched until the next frame.
    pub fn push_scroll_event(&mut self, offset: f64, timestamp_ms: f64) -> ChoreoResult<()> {
        if !offset.is_finite() || !timestamp_ms.is_finite() {
            return Err(ChoreoError::InvalidData(format!(
                "scroll event must be finite: offset={offset}, timestamp={timestamp_ms}"
            )));
        }
        self.target = offset;
        if self.mode == ScrollMode::Native {
            self.offset = offset;
        }
        self.pending_events += 1;
        Ok(())
    }

    /// Latest offset. `0` before any event.
    #[must_use]
    pub fn current_offset(&self) -> f64 {
        self.offset
    }

    /// Offset the source is heading to. Equal to `current_offset` in native mode.
    #[must_use]
    pub fn target_offset(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.offset == self.target
    }

    /// Makes the next frame dispatch even if the offset did not move.
    pub fn request_refresh(&mut self) {
        self.force_refresh = true;
    }

    /// Number of native events folded into the most recent sample.
    #[must_use]
    pub fn coalesced_events(&self) -> usize {
        self.coalesced_events
    }

    #[must_use]
    pub fn last_sample(&self) -> Option<ScrollSample> {
        self.last
    }

    fn step_smoothing(&mut self) {
        if let ScrollMode::Smoothed {
            lerp,
            snap_threshold_px,
        } = self.mode
        {
            if self.offset == self.target {
                return;
            }
            self.offset += (self.target - self.offset) * lerp;
            if (self.target - self.offset).abs() < snap_threshold_px {
                self.offset = self.target;
            }
        }
    }

    /// Produces this frame's sample.
    ///
    /// Returns `None` when the offset has not changed since the last
    /// dispatched sample and no refresh was requested.
    pub fn take_frame_sample(&mut self, timestamp_ms: f64) -> Option<ScrollSample> {
        self.step_smoothing();

        let moved = self.last.is_none_or(|last| last.offset != self.offset);
        if !moved && !self.force_refresh {
            self.pending_events = 0;
            return None;
        }

        let sample = ScrollSample::new(self.offset, timestamp_ms);
        self.coalesced_events = self.pending_events;
        self.pending_events = 0;
        self.force_refresh = false;
        self.previous = self.last.replace(sample);
        trace!(
            offset = sample.offset,
            coalesced = self.coalesced_events,
            "scroll sample taken"
        );
        Some(sample)
    }

    /// Hands `sample` to every subscriber. Returns how many ran.
    pub fn dispatch(&mut self, sample: &ScrollSample) -> usize {
        self.subscribers.dispatch(sample)
    }

    /// Offset delta over time delta between the last two samples.
    #[must_use]
    pub fn velocity_px_per_ms(&self) -> f64 {
        let (Some(previous), Some(last)) = (self.previous, self.last) else {
            return 0.0;
        };
        let elapsed = last.timestamp_ms - previous.timestamp_ms;
        if elapsed == 0.0 || !elapsed.is_finite() {
            return 0.0;
        }
        (last.offset - previous.offset) / elapsed
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ScrollSample) + 'static) -> SubscriptionId {
        let id = self.subscribers.register(callback);
        debug!(subscription = id.raw(), "scroll subscriber added");
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> ChoreoResult<()> {
        self.subscribers.remove(id)?;
        debug!(subscription = id.raw(), "scroll subscriber removed");
        Ok(())
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drops every subscriber and resets to offset `0`.
    pub fn reset(&mut self) {
        self.subscribers.clear();
        self.offset = 0.0;
        self.target = 0.0;
        self.pending_events = 0;
        self.coalesced_events = 0;
        self.previous = None;
        self.last = None;
        self.force_refresh = false;
    }
}
