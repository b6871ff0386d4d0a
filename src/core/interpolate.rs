use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::easing::Easing;
use crate::core::phase::PhaseTable;
use crate::core::types::Progress;
use crate::error::{ChoreoError, ChoreoResult};

const CONTINUITY_TOLERANCE: f64 = 1e-9;

/// Per-frame property values for one animated target.
///
/// Insertion-ordered so style writes are emitted in a stable order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualState {
    values: IndexMap<String, f64>,
}

impl VisualState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, property: impl Into<String>, value: f64) {
        self.values.insert(property.into(), value);
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<f64> {
        self.values.get(property).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .map(|(property, value)| (property.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn validate(&self) -> ChoreoResult<()> {
        for (property, value) in &self.values {
            if !value.is_finite() {
                return Err(ChoreoError::InvalidData(format!(
                    "property `{property}` must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Pure mapping from phase-local progress to one output property.
pub trait PropertyMapper {
    fn property(&self) -> &str;
    fn map(&self, phase: &str, local: f64) -> f64;
}

/// Eased `from -> to` movement of a property during one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl Segment {
    #[must_use]
    pub const fn new(from: f64, to: f64, easing: Easing) -> Self {
        Self { from, to, easing }
    }

    #[must_use]
    pub const fn hold(value: f64) -> Self {
        Self::new(value, value, Easing::Linear)
    }

    #[must_use]
    pub fn sample(self, local: f64) -> f64 {
        let eased = self.easing.apply(local);
        if eased >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * eased
    }
}

/// Keyframe-style mapper: one segment per phase name.
///
/// Once resolved against a table, a phase without a segment holds the end
/// value of the last segment before it, or the first segment's `from` when
/// none precedes it. `rest` is only output by a track with no segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTrack {
    pub property: String,
    #[serde(default)]
    pub rest: f64,
    #[serde(default)]
    pub segments: IndexMap<String, Segment>,
}

impl PropertyTrack {
    #[must_use]
    pub fn new(property: impl Into<String>, rest: f64) -> Self {
        Self {
            property: property.into(),
            rest,
            segments: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn segment(mut self, phase: impl Into<String>, from: f64, to: f64, easing: Easing) -> Self {
        self.segments
            .insert(phase.into(), Segment::new(from, to, easing));
        self
    }

    #[must_use]
    pub fn hold(mut self, phase: impl Into<String>, value: f64) -> Self {
        self.segments.insert(phase.into(), Segment::hold(value));
        self
    }

    pub fn validate(&self, table: &PhaseTable) -> ChoreoResult<()> {
        if !self.rest.is_finite() {
            return Err(ChoreoError::InvalidData(format!(
                "track `{}` rest value must be finite",
                self.property
            )));
        }
        for (phase, segment) in &self.segments {
            if table.index_of(phase).is_none() {
                return Err(ChoreoError::InvalidData(format!(
                    "track `{}` references unknown phase `{phase}`",
                    self.property
                )));
            }
            if !segment.from.is_finite() || !segment.to.is_finite() {
                return Err(ChoreoError::InvalidData(format!(
                    "track `{}` segment `{phase}` must have finite endpoints",
                    self.property
                )));
            }
            segment.easing.validate()?;
        }
        Ok(())
    }

    /// Validates against `table` and fills every uncovered phase with a hold,
    /// leaving one segment per phase in table order.
    pub fn resolve(&self, table: &PhaseTable) -> ChoreoResult<Self> {
        self.validate(table)?;
        let mut held = self.first_from();
        let mut segments = IndexMap::with_capacity(table.len());
        for phase in table.phases() {
            let segment = match self.segments.get(&phase.name) {
                Some(segment) => {
                    held = segment.to;
                    *segment
                }
                None => Segment::hold(held),
            };
            segments.insert(phase.name.clone(), segment);
        }
        Ok(Self {
            property: self.property.clone(),
            rest: self.rest,
            segments,
        })
    }

    fn first_from(&self) -> f64 {
        self.segments
            .first()
            .map_or(self.rest, |(_, segment)| segment.from)
    }
}

impl PropertyMapper for PropertyTrack {
    fn property(&self) -> &str {
        &self.property
    }

    fn map(&self, phase: &str, local: f64) -> f64 {
        self.segments
            .get(phase)
            .map_or_else(|| self.first_from(), |segment| segment.sample(local))
    }
}

/// Closure-backed mapper for shapes that do not fit a keyframe track.
pub struct FnMapper<F> {
    property: String,
    map: F,
}

impl<F> FnMapper<F>
where
    F: Fn(&str, f64) -> f64,
{
    #[must_use]
    pub fn new(property: impl Into<String>, map: F) -> Self {
        Self {
            property: property.into(),
            map,
        }
    }
}

impl<F> PropertyMapper for FnMapper<F>
where
    F: Fn(&str, f64) -> f64,
{
    fn property(&self) -> &str {
        &self.property
    }

    fn map(&self, phase: &str, local: f64) -> f64 {
        (self.map)(phase, local)
    }
}

impl<F> fmt::Debug for FnMapper<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMapper")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Evaluates `mappers` at the phase `progress` falls into.
#[must_use]
pub fn evaluate(
    progress: Progress,
    table: &PhaseTable,
    mappers: &[&dyn PropertyMapper],
) -> VisualState {
    let sample = table.locate(progress);
    let mut state = VisualState::new();
    for mapper in mappers {
        state.insert(mapper.property(), mapper.map(sample.name, sample.local));
    }
    state
}

/// Phase table plus the mappers driven by it.
pub struct PhaseInterpolator {
    table: PhaseTable,
    mappers: Vec<Box<dyn PropertyMapper>>,
}

impl PhaseInterpolator {
    #[must_use]
    pub fn new(table: PhaseTable) -> Self {
        Self {
            table,
            mappers: Vec::new(),
        }
    }

    /// Adds a keyframe track resolved against this interpolator's table.
    pub fn with_track(mut self, track: PropertyTrack) -> ChoreoResult<Self> {
        let resolved = track.resolve(&self.table)?;
        self.mappers.push(Box::new(resolved));
        Ok(self)
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: impl PropertyMapper + 'static) -> Self {
        self.mappers.push(Box::new(mapper));
        self
    }

    #[must_use]
    pub fn table(&self) -> &PhaseTable {
        &self.table
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.mappers.iter().map(|mapper| mapper.property())
    }

    #[must_use]
    pub fn evaluate(&self, progress: Progress) -> VisualState {
        let sample = self.table.locate(progress);
        let mut state = VisualState::new();
        for mapper in &self.mappers {
            state.insert(mapper.property(), mapper.map(sample.name, sample.local));
        }
        state
    }

    /// Verifies every mapper agrees with itself across each phase boundary.
    ///
    /// Compares the end of phase `i` with the start of phase `i + 1` at the
    /// same progress value. Nothing else enforces this, so every shipped
    /// table runs through it in tests.
    pub fn check_continuity(&self) -> ChoreoResult<()> {
        for (index, boundary) in self.table.boundaries() {
            let progress = Progress::new(boundary);
            let left = self.table.sample_in(index, progress);
            let right = self.table.sample_in(index + 1, progress);
            for mapper in &self.mappers {
                let left_value = mapper.map(left.name, left.local);
                let right_value = mapper.map(right.name, right.local);
                if (left_value - right_value).abs() > CONTINUITY_TOLERANCE {
                    return Err(ChoreoError::DiscontinuousMapping {
                        property: mapper.property().to_owned(),
                        boundary,
                        left: left_value,
                        right: right_value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PhaseInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseInterpolator")
            .field("table", &self.table)
            .field("properties", &self.properties().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_phase() -> PhaseTable {
        PhaseTable::from_breakpoints(&[("expand", 0.4), ("hold", 0.6), ("rise", 1.0)])
            .expect("valid table")
    }

    #[test]
    fn segment_reaches_exact_endpoint() {
        let segment = Segment::new(0.0, 150.0, Easing::EASE_OUT);
        assert_eq!(segment.sample(0.0), 0.0);
        assert_eq!(segment.sample(1.0), 150.0);
    }

    #[test]
    fn unresolved_track_holds_first_from() {
        let track = PropertyTrack::new("opacity", 0.25).segment("expand", 0.1, 1.0, Easing::Linear);
        assert!((track.map("expand", 0.5) - 0.55).abs() < 1e-12);
        assert_eq!(track.map("rise", 0.5), 0.1);
        assert_eq!(PropertyTrack::new("opacity", 0.25).map("rise", 0.5), 0.25);
    }

    #[test]
    fn resolved_track_holds_previous_segment_end() {
        let track = PropertyTrack::new("radius", 0.0)
            .segment("hold", 10.0, 75.0, Easing::Linear)
            .resolve(&three_phase())
            .expect("valid track");
        let phases: Vec<&str> = track.segments.keys().map(String::as_str).collect();
        assert_eq!(phases, ["expand", "hold", "rise"]);
        assert_eq!(track.map("expand", 0.5), 10.0);
        assert_eq!(track.map("rise", 0.0), 75.0);
        assert_eq!(track.map("rise", 1.0), 75.0);
    }

    #[test]
    fn track_validation_rejects_unknown_phase() {
        let track = PropertyTrack::new("opacity", 0.0).hold("fade", 1.0);
        let err = PhaseInterpolator::new(three_phase())
            .with_track(track)
            .expect_err("unknown phase");
        assert!(matches!(err, ChoreoError::InvalidData(_)));
    }

    #[test]
    fn continuity_check_flags_popping_tracks() {
        let popping = PropertyTrack::new("radius", 0.0)
            .segment("expand", 0.0, 75.0, Easing::Linear)
            .hold("hold", 80.0)
            .segment("rise", 80.0, 150.0, Easing::Linear);
        let interpolator = PhaseInterpolator::new(three_phase())
            .with_track(popping)
            .expect("valid track");
        let err = interpolator.check_continuity().expect_err("pop");
        match err {
            ChoreoError::DiscontinuousMapping {
                property,
                boundary,
                left,
                right,
            } => {
                assert_eq!(property, "radius");
                assert_eq!(boundary, 0.4);
                assert_eq!(left, 75.0);
                assert_eq!(right, 80.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn free_evaluate_matches_interpolator() {
        let track = PropertyTrack::new("radius", 0.0)
            .segment("expand", 0.0, 75.0, Easing::Linear)
            .hold("hold", 75.0)
            .segment("rise", 75.0, 150.0, Easing::Linear);
        let mapper = FnMapper::new("phase-index", |phase: &str, _| match phase {
            "expand" => 0.0,
            "hold" => 1.0,
            _ => 2.0,
        });
        let table = three_phase();
        let state = evaluate(Progress::new(0.8), &table, &[&track, &mapper]);
        let radius = state.get("radius").expect("radius");
        assert!((radius - 112.5).abs() < 1e-9);
        assert_eq!(state.get("phase-index"), Some(2.0));

        let interpolator = PhaseInterpolator::new(table)
            .with_track(track)
            .expect("valid")
            .with_mapper(mapper);
        assert_eq!(interpolator.evaluate(Progress::new(0.8)), state);
    }
}
