mod seamless_loop;

pub use seamless_loop::{
    LoopDirection, LoopMotion, LoopMove, LoopSettleConfig, LoopTick, SeamlessLoop, wrap_index,
};

use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, ChoreoResult};

/// Hard cap for `ticks_until_rest` so a bad config cannot spin forever.
const MAX_REST_TICKS: usize = 1_000_000;

/// Tuning for deterministic per-tick inertia.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaConfig {
    /// Multiplicative velocity decay per tick, in `(0, 1)`. Smaller stops sooner.
    pub decay_factor: f64,
    /// Velocity magnitude clamp, in px per tick.
    pub max_velocity: f64,
    /// Inertia stops when `abs(velocity)` drops below this threshold.
    pub stop_velocity_abs: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.95,
            max_velocity: 120.0,
            stop_velocity_abs: 0.05,
        }
    }
}

impl InertiaConfig {
    pub fn validate(self) -> ChoreoResult<()> {
        if !self.decay_factor.is_finite() || self.decay_factor <= 0.0 || self.decay_factor >= 1.0
        {
            return Err(ChoreoError::InvalidData(
                "inertia decay factor must be in (0, 1)".to_owned(),
            ));
        }
        if !self.max_velocity.is_finite() || self.max_velocity <= 0.0 {
            return Err(ChoreoError::InvalidData(
                "inertia max velocity must be finite and > 0".to_owned(),
            ));
        }
        if !self.stop_velocity_abs.is_finite() || self.stop_velocity_abs < 0.0 {
            return Err(ChoreoError::InvalidData(
                "inertia stop velocity must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Stateful velocity that decays toward zero absent new input.
///
/// `velocity(t + 1) = velocity(t) * decay + input`, clamped to `max_velocity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaState {
    config: InertiaConfig,
    velocity: f64,
    active: bool,
}

impl InertiaState {
    pub fn new(config: InertiaConfig) -> ChoreoResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            velocity: 0.0,
            active: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> InertiaConfig {
        self.config
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn clamp(&self, velocity: f64) -> f64 {
        velocity.clamp(-self.config.max_velocity, self.config.max_velocity)
    }

    /// Starts a throw at `velocity` px per tick.
    pub fn start(&mut self, velocity: f64) {
        if !velocity.is_finite() {
            self.stop();
            return;
        }
        self.velocity = self.clamp(velocity);
        self.active = self.velocity.abs() >= self.config.stop_velocity_abs && self.velocity != 0.0;
        if !self.active {
            self.velocity = 0.0;
        }
    }

    /// Feeds one input delta, e.g. the drag movement since the previous tick.
    pub fn push(&mut self, input_delta: f64) {
        if !input_delta.is_finite() {
            return;
        }
        self.start(self.velocity * self.config.decay_factor + input_delta);
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.velocity = 0.0;
    }

    /// Advances one tick without input and returns the displacement to apply.
    ///
    /// Returns `None` when inertia is not active.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.active {
            return None;
        }

        let displacement = self.velocity;
        self.velocity *= self.config.decay_factor;
        if self.velocity.abs() < self.config.stop_velocity_abs || self.velocity == 0.0 {
            self.stop();
        }
        Some(displacement)
    }

    /// Number of input-free ticks until `abs(velocity) < threshold`.
    #[must_use]
    pub fn ticks_until_rest(&self, threshold: f64) -> usize {
        let mut velocity = self.velocity.abs();
        let mut ticks = 0;
        while velocity >= threshold && ticks < MAX_REST_TICKS {
            velocity *= self.config.decay_factor;
            ticks += 1;
        }
        ticks
    }

    /// Total displacement the current velocity will still produce.
    #[must_use]
    pub fn projected_travel(&self) -> f64 {
        if !self.active {
            return 0.0;
        }
        let mut decaying = *self;
        let mut travel = 0.0;
        while let Some(step) = decaying.tick() {
            travel += step;
        }
        travel
    }
}

#[cfg(test)]
mod tests {
    use super::{InertiaConfig, InertiaState};

    #[test]
    fn push_accumulates_and_clamps() {
        let mut inertia = InertiaState::new(InertiaConfig {
            decay_factor: 0.5,
            max_velocity: 10.0,
            stop_velocity_abs: 0.01,
        })
        .expect("valid");
        inertia.push(4.0);
        assert_eq!(inertia.velocity(), 4.0);
        inertia.push(4.0);
        assert_eq!(inertia.velocity(), 6.0);
        inertia.push(100.0);
        assert_eq!(inertia.velocity(), 10.0);
        inertia.push(-1_000.0);
        assert_eq!(inertia.velocity(), -10.0);
    }

    #[test]
    fn tick_stops_below_threshold() {
        let mut inertia = InertiaState::new(InertiaConfig {
            decay_factor: 0.1,
            max_velocity: 100.0,
            stop_velocity_abs: 5.0,
        })
        .expect("valid");
        inertia.start(20.0);
        assert_eq!(inertia.tick(), Some(20.0));
        assert!(!inertia.is_active());
        assert_eq!(inertia.tick(), None);
    }

    #[test]
    fn rejects_invalid_config() {
        for decay_factor in [0.0, 1.0, 1.5, f64::NAN] {
            let config = InertiaConfig {
                decay_factor,
                ..InertiaConfig::default()
            };
            assert!(InertiaState::new(config).is_err(), "{decay_factor}");
        }
    }

    #[test]
    fn projected_travel_matches_ticked_travel() {
        let mut inertia = InertiaState::new(InertiaConfig::default()).expect("valid");
        inertia.start(40.0);
        let projected = inertia.projected_travel();
        let mut travelled = 0.0;
        while let Some(step) = inertia.tick() {
            travelled += step;
        }
        assert!((projected - travelled).abs() < 1e-9);
    }
}
