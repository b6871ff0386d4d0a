//! Stock section shapes.
//!
//! Each builder returns a `PhaseInterpolator` whose tracks are continuous at
//! every phase boundary. The numeric literals are per-section tuning values
//! and are kept exactly as authored.

use serde::{Deserialize, Serialize};

use crate::core::color::{Color, ThemePalette};
use crate::core::easing::{EaseDirection, Easing};
use crate::core::interpolate::{PhaseInterpolator, PropertyTrack};
use crate::core::phase::PhaseTable;
use crate::error::{ChoreoError, ChoreoResult};

pub const CLIP_RADIUS_PCT: &str = "clip-radius-pct";
pub const CLIP_CENTER_Y_PCT: &str = "clip-center-y-pct";
pub const TRANSLATE_Y_PX: &str = "translate-y-px";
/// Written by seamless loops for each bound item.
pub const TRANSLATE_X_PX: &str = "translate-x-px";
pub const SCALE: &str = "scale";
pub const OPACITY: &str = "opacity";
pub const COLOR_MIX_RATIO: &str = "color-mix-ratio";
pub const COLOR_R: &str = "color-r";
pub const COLOR_G: &str = "color-g";
pub const COLOR_B: &str = "color-b";
pub const COLOR_A: &str = "color-a";

/// Circle mask that grows from the center, holds, then lifts off.
///
/// Phases: expand `0..0.4`, hold `0.4..0.6`, rise `0.6..1`.
pub fn circular_mask_reveal() -> ChoreoResult<PhaseInterpolator> {
    let table = PhaseTable::from_breakpoints(&[("expand", 0.4), ("hold", 0.6), ("rise", 1.0)])?;
    PhaseInterpolator::new(table)
        .with_track(
            PropertyTrack::new(CLIP_RADIUS_PCT, 0.0)
                .segment("expand", 0.0, 75.0, Easing::power(2, EaseDirection::Out))
                .hold("hold", 75.0)
                .segment("rise", 75.0, 150.0, Easing::power(1, EaseDirection::In)),
        )?
        .with_track(
            PropertyTrack::new(CLIP_CENTER_Y_PCT, 50.0).segment(
                "rise",
                50.0,
                35.0,
                Easing::Sine(EaseDirection::InOut),
            ),
        )?
        .with_track(PropertyTrack::new(TRANSLATE_Y_PX, 0.0).segment(
            "rise",
            0.0,
            -120.0,
            Easing::Linear,
        ))
}

/// Pinned card that scales in, holds, slides up and settles behind the next card.
pub fn pinned_stack() -> ChoreoResult<PhaseInterpolator> {
    let table = PhaseTable::from_breakpoints(&[
        ("expand", 0.25),
        ("hold", 0.5),
        ("rise", 0.85),
        ("settle", 1.0),
    ])?;
    PhaseInterpolator::new(table)
        .with_track(
            PropertyTrack::new(SCALE, 1.0)
                .segment("expand", 0.8, 1.0, Easing::power(3, EaseDirection::Out))
                .segment("settle", 1.0, 0.95, Easing::Linear),
        )?
        .with_track(
            PropertyTrack::new(TRANSLATE_Y_PX, 0.0)
                .segment("rise", 0.0, -240.0, Easing::power(2, EaseDirection::InOut))
                .hold("settle", -240.0),
        )?
        .with_track(
            PropertyTrack::new(OPACITY, 1.0)
                .segment("expand", 0.0, 1.0, Easing::Linear)
                .segment("settle", 1.0, 0.6, Easing::Linear),
        )
}

/// Translate a layer by `travel_px × multiplier` over the region.
///
/// The multiplier amplifies a linked element's travel into a parallax push.
pub fn vertical_push(travel_px: f64, multiplier: f64) -> ChoreoResult<PhaseInterpolator> {
    if !travel_px.is_finite() || !multiplier.is_finite() {
        return Err(ChoreoError::InvalidData(
            "push travel and multiplier must be finite".to_owned(),
        ));
    }
    PhaseInterpolator::new(PhaseTable::single("push")).with_track(
        PropertyTrack::new(TRANSLATE_Y_PX, 0.0).segment(
            "push",
            0.0,
            -travel_px * multiplier,
            Easing::Linear,
        ),
    )
}

/// Fade in, stay visible, fade out.
pub fn crossfade() -> ChoreoResult<PhaseInterpolator> {
    let table =
        PhaseTable::from_breakpoints(&[("fade-in", 0.3), ("hold", 0.7), ("fade-out", 1.0)])?;
    PhaseInterpolator::new(table).with_track(
        PropertyTrack::new(OPACITY, 1.0)
            .segment("fade-in", 0.0, 1.0, Easing::power(1, EaseDirection::Out))
            .hold("hold", 1.0)
            .segment("fade-out", 1.0, 0.0, Easing::power(1, EaseDirection::In)),
    )
}

/// Linear blend between two background colors, one channel per property.
pub fn color_blend(from: Color, to: Color) -> ChoreoResult<PhaseInterpolator> {
    from.validate()?;
    to.validate()?;
    let channel = |property: &str, from: f64, to: f64| {
        PropertyTrack::new(property, from).segment("blend", from, to, Easing::Linear)
    };
    PhaseInterpolator::new(PhaseTable::single("blend"))
        .with_track(channel(COLOR_MIX_RATIO, 0.0, 1.0))?
        .with_track(channel(COLOR_R, from.red, to.red))?
        .with_track(channel(COLOR_G, from.green, to.green))?
        .with_track(channel(COLOR_B, from.blue, to.blue))?
        .with_track(channel(COLOR_A, from.alpha, to.alpha))
}

/// Serializable description of a section shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeSpec {
    CircularMask,
    PinnedStack,
    VerticalPush {
        travel_px: f64,
        #[serde(default = "default_push_multiplier")]
        multiplier: f64,
    },
    Crossfade,
    /// Colors are theme palette names.
    ColorBlend { from: String, to: String },
    Custom {
        phases: PhaseTable,
        tracks: Vec<PropertyTrack>,
    },
}

fn default_push_multiplier() -> f64 {
    1.0
}

impl ShapeSpec {
    /// Builds the interpolator and rejects shapes that would pop at a boundary.
    pub fn build(&self, palette: &ThemePalette) -> ChoreoResult<PhaseInterpolator> {
        let interpolator = match self {
            Self::CircularMask => circular_mask_reveal()?,
            Self::PinnedStack => pinned_stack()?,
            Self::VerticalPush {
                travel_px,
                multiplier,
            } => vertical_push(*travel_px, *multiplier)?,
            Self::Crossfade => crossfade()?,
            Self::ColorBlend { from, to } => color_blend(palette.get(from)?, palette.get(to)?)?,
            Self::Custom { phases, tracks } => {
                let mut interpolator = PhaseInterpolator::new(phases.clone());
                for track in tracks {
                    interpolator = interpolator.with_track(track.clone())?;
                }
                interpolator
            }
        };
        interpolator.check_continuity()?;
        Ok(interpolator)
    }
}
