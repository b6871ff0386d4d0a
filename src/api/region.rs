use tracing::debug;

use crate::core::color::ThemePalette;
use crate::core::interpolate::PhaseInterpolator;
use crate::core::progress::{ProgressNormalizer, TriggerRegion, TriggerRule};
use crate::core::shapes::ShapeSpec;
use crate::core::stagger::Stagger;
use crate::core::types::{Progress, RegionId, TargetId};
use crate::error::ChoreoResult;
use crate::render::StyleWriter;
use crate::scroll::{Gate, Readiness};

use super::Choreographer;

/// Everything needed to animate one page section.
///
/// `trigger` supplies the geometry that defines the trigger region;
/// `target` receives the computed style. They are often the same element.
#[derive(Debug)]
pub struct RegionSpec {
    pub trigger: TargetId,
    pub target: TargetId,
    pub rule: TriggerRule,
    pub interpolator: PhaseInterpolator,
    pub gate: Option<Gate>,
    pub stagger: Option<(Stagger, Vec<TargetId>)>,
}

impl RegionSpec {
    /// Animates `trigger` itself from the moment it enters until it leaves.
    #[must_use]
    pub fn new(trigger: TargetId, interpolator: PhaseInterpolator) -> Self {
        Self {
            trigger,
            target: trigger,
            rule: TriggerRule::enter_to_exit(),
            interpolator,
            gate: None,
            stagger: None,
        }
    }

    pub fn from_shape(
        trigger: TargetId,
        shape: &ShapeSpec,
        palette: &ThemePalette,
    ) -> ChoreoResult<Self> {
        Ok(Self::new(trigger, shape.build(palette)?))
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: TriggerRule) -> Self {
        self.rule = rule;
        self
    }

    #[must_use]
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Writes to `items` in sequence instead of `target`, e.g. split text lines.
    pub fn with_staggered_targets(mut self, items: Vec<TargetId>, overlap: f64) -> ChoreoResult<Self> {
        let stagger = Stagger::new(items.len(), overlap)?;
        self.stagger = Some((stagger, items));
        Ok(self)
    }
}

#[derive(Debug)]
pub(super) struct RegionEntry {
    pub(super) spec: RegionSpec,
    pub(super) normalizer: ProgressNormalizer,
    pub(super) gate_started_ms: Option<f64>,
    pub(super) readiness: Readiness,
    pub(super) last_progress: Option<Progress>,
}

impl RegionEntry {
    fn new(mut spec: RegionSpec, readiness_timeout_ms: f64) -> ChoreoResult<Self> {
        let readiness = match spec.gate.take() {
            Some(gate) => {
                let gate = gate.bounded(readiness_timeout_ms);
                gate.validate()?;
                spec.gate = Some(gate);
                Readiness::Pending
            }
            None => Readiness::Ready,
        };
        Ok(Self {
            normalizer: ProgressNormalizer::new(spec.rule),
            spec,
            gate_started_ms: None,
            readiness,
            last_progress: None,
        })
    }

    pub(super) fn is_ready(&self) -> bool {
        self.readiness.is_resolved()
    }
}

impl<W: StyleWriter> Choreographer<W> {
    /// Registers a region. Gates without a timeout get the configured one.
    pub fn add_region(&mut self, spec: RegionSpec) -> ChoreoResult<RegionId> {
        let entry = RegionEntry::new(spec, self.config.readiness_timeout_ms)?;
        let id = RegionId::new(self.region_alloc.allocate());
        debug!(
            region = id.raw(),
            trigger = entry.spec.trigger.raw(),
            gated = !entry.is_ready(),
            "region added"
        );
        self.regions.insert(id, entry);
        self.source.request_refresh();
        Ok(id)
    }

    /// Builds `shape` with the configured palette and registers it.
    pub fn add_shape_region(&mut self, trigger: TargetId, shape: &ShapeSpec) -> ChoreoResult<RegionId> {
        let spec = RegionSpec::from_shape(trigger, shape, &self.config.palette)?;
        self.add_region(spec)
    }

    pub fn remove_region(&mut self, id: RegionId) -> ChoreoResult<RegionSpec> {
        let entry = self.regions.shift_remove(&id).ok_or_else(|| id.unknown())?;
        debug!(region = id.raw(), "region removed");
        Ok(entry.spec)
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    /// Progress computed for `id` on the last frame it was evaluated.
    pub fn region_progress(&self, id: RegionId) -> ChoreoResult<Option<Progress>> {
        self.regions
            .get(&id)
            .map(|entry| entry.last_progress)
            .ok_or_else(|| id.unknown())
    }

    /// Boundaries from the last measurement. `None` until measured.
    pub fn trigger_region(&self, id: RegionId) -> ChoreoResult<Option<TriggerRegion>> {
        self.regions
            .get(&id)
            .map(|entry| entry.normalizer.region())
            .ok_or_else(|| id.unknown())
    }

    pub fn region_readiness(&self, id: RegionId) -> ChoreoResult<Readiness> {
        self.regions
            .get(&id)
            .map(|entry| entry.readiness)
            .ok_or_else(|| id.unknown())
    }
}
