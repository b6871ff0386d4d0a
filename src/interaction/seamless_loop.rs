use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, ChoreoResult};
use crate::interaction::{InertiaConfig, InertiaState};

/// Wraps `index` into `0..count`, in both directions.
///
/// `wrap_index(-1, n) == n - 1` and `wrap_index(n, n) == 0`.
/// Returns `0` when `count` is zero.
#[must_use]
pub fn wrap_index(index: i64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let count = count as i64;
    index.rem_euclid(count) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoopDirection {
    #[default]
    Shortest,
    Forward,
    Backward,
}

/// Timeline move toward one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopMove {
    pub index: usize,
    pub from: f64,
    pub to: f64,
}

impl LoopMove {
    #[must_use]
    pub fn delta(self) -> f64 {
        self.to - self.from
    }
}

/// Tuning for the glide onto the nearest item after a throw or a `go_to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopSettleConfig {
    /// Share of the remaining distance covered per tick.
    pub lerp: f64,
    /// Distance under which the loop snaps onto its target.
    pub snap_threshold_px: f64,
}

impl Default for LoopSettleConfig {
    fn default() -> Self {
        Self {
            lerp: 0.18,
            snap_threshold_px: 0.5,
        }
    }
}

impl LoopSettleConfig {
    pub fn validate(self) -> ChoreoResult<()> {
        if !self.lerp.is_finite() || self.lerp <= 0.0 || self.lerp > 1.0 {
            return Err(ChoreoError::InvalidData(
                "loop settle lerp must be in (0, 1]".to_owned(),
            ));
        }
        if !self.snap_threshold_px.is_finite() || self.snap_threshold_px <= 0.0 {
            return Err(ChoreoError::InvalidData(
                "loop snap threshold must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMotion {
    Idle,
    Dragging,
    Throwing,
    Settling,
    AutoAdvancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopTick {
    pub motion: LoopMotion,
    pub position: f64,
    pub index: usize,
}

/// Infinite horizontal sequence of items laid out end to end.
///
/// `position` is an unwrapped timeline offset in pixels: moving backward past
/// item 0 keeps decreasing it, so wraparound never produces a jump. Only
/// presentation (`item_x`, `nearest_index`) reduces it modulo the loop length.
#[derive(Debug, Clone, PartialEq)]
pub struct SeamlessLoop {
    widths: Vec<f64>,
    gap: f64,
    offsets: Vec<f64>,
    total_length: f64,
    position: f64,
    current_index: usize,
    inertia: InertiaState,
    settle: LoopSettleConfig,
    settle_target: Option<f64>,
    dragging: bool,
    auto_advance_px: f64,
    paused: bool,
}

impl SeamlessLoop {
    pub fn new(widths: Vec<f64>, gap: f64) -> ChoreoResult<Self> {
        if widths.is_empty() {
            return Err(ChoreoError::InvalidData(
                "seamless loop needs at least one item".to_owned(),
            ));
        }
        if widths.iter().any(|width| !width.is_finite() || *width <= 0.0) {
            return Err(ChoreoError::InvalidData(
                "loop item widths must be finite and > 0".to_owned(),
            ));
        }
        if !gap.is_finite() || gap < 0.0 {
            return Err(ChoreoError::InvalidData(
                "loop gap must be finite and >= 0".to_owned(),
            ));
        }

        let mut offsets = Vec::with_capacity(widths.len());
        let mut cursor = 0.0;
        for width in &widths {
            offsets.push(cursor);
            cursor += width + gap;
        }

        Ok(Self {
            widths,
            gap,
            offsets,
            total_length: cursor,
            position: 0.0,
            current_index: 0,
            inertia: InertiaState::new(InertiaConfig::default())?,
            settle: LoopSettleConfig::default(),
            settle_target: None,
            dragging: false,
            auto_advance_px: 0.0,
            paused: false,
        })
    }

    /// Equal-width items.
    pub fn uniform(count: usize, width: f64, gap: f64) -> ChoreoResult<Self> {
        Self::new(vec![width; count], gap)
    }

    pub fn with_inertia(mut self, config: InertiaConfig) -> ChoreoResult<Self> {
        self.inertia = InertiaState::new(config)?;
        Ok(self)
    }

    pub fn with_settle(mut self, config: LoopSettleConfig) -> ChoreoResult<Self> {
        config.validate()?;
        self.settle = config;
        Ok(self)
    }

    /// Pixels advanced per idle tick. Negative values run the loop backward.
    pub fn with_auto_advance(mut self, px_per_tick: f64) -> ChoreoResult<Self> {
        if !px_per_tick.is_finite() {
            return Err(ChoreoError::InvalidData(
                "auto-advance speed must be finite".to_owned(),
            ));
        }
        self.auto_advance_px = px_per_tick;
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    #[must_use]
    pub fn gap(&self) -> f64 {
        self.gap
    }

    #[must_use]
    pub fn item_offset(&self, index: i64) -> f64 {
        self.offsets[wrap_index(index, self.len())]
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn wrapped_position(&self) -> f64 {
        self.position.rem_euclid(self.total_length)
    }

    /// Share of one full cycle covered, in `[0, 1)`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.wrapped_position() / self.total_length
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// On-screen x of item `index`.
    ///
    /// An item that has fully left the left edge re-enters on the right, so
    /// the result stays in `(-(width + gap), total_length)`.
    #[must_use]
    pub fn item_x(&self, index: usize) -> f64 {
        let index = wrap_index(index as i64, self.len());
        let span = self.widths[index] + self.gap;
        let mut x = self.offsets[index] - self.wrapped_position();
        if x <= -span {
            x += self.total_length;
        }
        x
    }

    /// Wrap-aware distance between two timeline positions.
    #[must_use]
    pub fn circular_distance(&self, a: f64, b: f64) -> f64 {
        let linear = (a - b).rem_euclid(self.total_length);
        linear.min(self.total_length - linear)
    }

    /// Item whose start is closest to `position` on the circle. Ties go to the lower index.
    #[must_use]
    pub fn nearest_index_to(&self, position: f64) -> usize {
        let wrapped = position.rem_euclid(self.total_length);
        self.offsets
            .iter()
            .enumerate()
            .min_by_key(|(index, offset)| {
                (
                    OrderedFloat(self.circular_distance(wrapped, **offset)),
                    *index,
                )
            })
            .map_or(0, |(index, _)| index)
    }

    #[must_use]
    pub fn nearest_index(&self) -> usize {
        self.nearest_index_to(self.position)
    }

    /// Resolves the timeline move that lands on item `index`.
    #[must_use]
    pub fn target_for(&self, index: i64, direction: LoopDirection) -> LoopMove {
        let index = wrap_index(index, self.len());
        let forward = (self.offsets[index] - self.wrapped_position()).rem_euclid(self.total_length);
        let delta = if forward == 0.0 {
            0.0
        } else {
            let backward = forward - self.total_length;
            match direction {
                LoopDirection::Forward => forward,
                LoopDirection::Backward => backward,
                LoopDirection::Shortest => {
                    if forward <= -backward {
                        forward
                    } else {
                        backward
                    }
                }
            }
        };
        LoopMove {
            index,
            from: self.position,
            to: self.position + delta,
        }
    }

    /// Glides to item `index`; `tick` performs the movement.
    pub fn go_to(&mut self, index: i64, direction: LoopDirection) -> LoopMove {
        let motion = self.target_for(index, direction);
        self.inertia.stop();
        self.dragging = false;
        self.current_index = motion.index;
        self.settle_target = Some(motion.to);
        motion
    }

    /// Moves to item `index` immediately.
    pub fn jump_to(&mut self, index: i64) -> LoopMove {
        let motion = self.target_for(index, LoopDirection::Shortest);
        self.inertia.stop();
        self.settle_target = None;
        self.position = motion.to;
        self.current_index = motion.index;
        motion
    }

    pub fn next(&mut self) -> LoopMove {
        self.go_to(self.current_index as i64 + 1, LoopDirection::Forward)
    }

    pub fn previous(&mut self) -> LoopMove {
        self.go_to(self.current_index as i64 - 1, LoopDirection::Backward)
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.inertia.stop();
        self.settle_target = None;
    }

    /// Applies a pointer movement. Dragging right moves items right.
    pub fn drag_by(&mut self, dx: f64) {
        if !self.dragging || !dx.is_finite() {
            return;
        }
        self.position -= dx;
        self.inertia.push(-dx);
        self.current_index = self.nearest_index();
    }

    /// Ends the drag; accumulated velocity keeps the loop moving.
    pub fn release(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        if !self.inertia.is_active() {
            self.begin_settle();
        }
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.inertia.velocity()
    }

    fn begin_settle(&mut self) {
        let nearest = self.nearest_index();
        let motion = self.target_for(nearest as i64, LoopDirection::Shortest);
        self.current_index = motion.index;
        self.settle_target = Some(motion.to);
    }

    /// Advances one frame of drag inertia, settling, or auto-advance.
    pub fn tick(&mut self) -> LoopTick {
        let motion = if self.dragging {
            LoopMotion::Dragging
        } else if let Some(displacement) = self.inertia.tick() {
            self.position += displacement;
            if !self.inertia.is_active() {
                self.begin_settle();
            }
            LoopMotion::Throwing
        } else if let Some(target) = self.settle_target {
            self.position += (target - self.position) * self.settle.lerp;
            if (target - self.position).abs() < self.settle.snap_threshold_px {
                self.position = target;
                self.settle_target = None;
            }
            LoopMotion::Settling
        } else if self.auto_advance_px != 0.0 && !self.paused {
            self.position += self.auto_advance_px;
            LoopMotion::AutoAdvancing
        } else {
            LoopMotion::Idle
        };

        if !matches!(motion, LoopMotion::Idle | LoopMotion::Settling) {
            self.current_index = self.nearest_index();
        }

        LoopTick {
            motion,
            position: self.position,
            index: self.current_index,
        }
    }
}
