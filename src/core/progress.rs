use serde::{Deserialize, Serialize};

use crate::core::types::{ElementBounds, Progress, Viewport};
use crate::error::{ChoreoError, ChoreoResult};

/// Scroll-offset interval over which progress moves from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerRegion {
    pub start_boundary: f64,
    pub end_boundary: f64,
}

impl TriggerRegion {
    pub fn new(start_boundary: f64, end_boundary: f64) -> ChoreoResult<Self> {
        if !start_boundary.is_finite() || !end_boundary.is_finite() {
            return Err(ChoreoError::InvalidData(
                "trigger boundaries must be finite".to_owned(),
            ));
        }
        Ok(Self {
            start_boundary,
            end_boundary,
        })
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.end_boundary - self.start_boundary
    }

    /// True when the region cannot produce a meaningful ratio.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        let length = self.length();
        !length.is_finite() || length <= 0.0
    }

    #[must_use]
    pub fn progress(self, offset: f64) -> Progress {
        compute_progress(offset, self)
    }
}

/// Maps a scroll offset onto `[0, 1]` inside `region`.
///
/// Zero-length and reversed regions return `0` instead of dividing by a
/// non-positive span. A NaN offset returns `0`; infinite offsets clamp.
#[must_use]
pub fn compute_progress(offset: f64, region: TriggerRegion) -> Progress {
    if region.is_degenerate() {
        return Progress::START;
    }
    let span = region.end_boundary - region.start_boundary;
    Progress::new((offset - region.start_boundary) / span)
}

/// Point on an element or on the viewport, as a fraction of its height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeAnchor {
    Top,
    Center,
    Bottom,
    Fraction(f64),
}

impl EdgeAnchor {
    #[must_use]
    pub fn fraction(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
            Self::Fraction(value) => value,
        }
    }
}

/// Rule resolving one boundary of a trigger region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerEdge {
    /// Boundary reached when the element anchor meets the viewport anchor.
    Anchored {
        element: EdgeAnchor,
        viewport: EdgeAnchor,
        #[serde(default)]
        offset_px: f64,
    },
    /// Fixed document scroll offset.
    Absolute(f64),
    /// Distance past the resolved start boundary. Only meaningful for `end`.
    AfterStart {
        #[serde(default)]
        px: f64,
        #[serde(default)]
        viewport_heights: f64,
    },
}

impl TriggerEdge {
    #[must_use]
    pub const fn anchored(element: EdgeAnchor, viewport: EdgeAnchor) -> Self {
        Self::Anchored {
            element,
            viewport,
            offset_px: 0.0,
        }
    }

    fn resolve(
        self,
        bounds: ElementBounds,
        viewport: Viewport,
        start: Option<f64>,
    ) -> ChoreoResult<f64> {
        let viewport_height = f64::from(viewport.height);
        let value = match self {
            Self::Anchored {
                element,
                viewport: viewport_anchor,
                offset_px,
            } => {
                bounds.top + element.fraction() * bounds.height
                    - viewport_anchor.fraction() * viewport_height
                    + offset_px
            }
            Self::Absolute(px) => px,
            Self::AfterStart {
                px,
                viewport_heights,
            } => {
                let Some(start) = start else {
                    return Err(ChoreoError::InvalidData(
                        "`AfterStart` edge can only resolve a region end".to_owned(),
                    ));
                };
                start + px + viewport_heights * viewport_height
            }
        };

        if !value.is_finite() {
            return Err(ChoreoError::InvalidData(
                "resolved trigger boundary must be finite".to_owned(),
            ));
        }
        Ok(value)
    }
}

/// Start and end rules for one animated section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub start: TriggerEdge,
    pub end: TriggerEdge,
}

impl TriggerRule {
    #[must_use]
    pub const fn new(start: TriggerEdge, end: TriggerEdge) -> Self {
        Self { start, end }
    }

    /// Element top reaches viewport bottom, until element bottom leaves viewport top.
    #[must_use]
    pub const fn enter_to_exit() -> Self {
        Self::new(
            TriggerEdge::anchored(EdgeAnchor::Top, EdgeAnchor::Bottom),
            TriggerEdge::anchored(EdgeAnchor::Bottom, EdgeAnchor::Top),
        )
    }

    /// Element top pinned at viewport top for `viewport_heights` screens of scroll.
    #[must_use]
    pub const fn pinned(viewport_heights: f64) -> Self {
        Self::new(
            TriggerEdge::anchored(EdgeAnchor::Top, EdgeAnchor::Top),
            TriggerEdge::AfterStart {
                px: 0.0,
                viewport_heights,
            },
        )
    }

    /// Element top enters viewport bottom, until element top reaches viewport center.
    #[must_use]
    pub const fn top_to_center() -> Self {
        Self::new(
            TriggerEdge::anchored(EdgeAnchor::Top, EdgeAnchor::Bottom),
            TriggerEdge::anchored(EdgeAnchor::Top, EdgeAnchor::Center),
        )
    }

    pub fn resolve(self, bounds: ElementBounds, viewport: Viewport) -> ChoreoResult<TriggerRegion> {
        bounds.validate()?;
        viewport.validate()?;

        let start = self.start.resolve(bounds, viewport, None)?;
        let end = self.end.resolve(bounds, viewport, Some(start))?;
        TriggerRegion::new(start, end)
    }
}

/// Keeps one trigger region in sync with layout.
///
/// Boundaries are document pixels, so any layout change makes them stale.
/// Callers compare the measured generation against the current layout
/// generation and call `refresh` before sampling again.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressNormalizer {
    rule: TriggerRule,
    region: Option<TriggerRegion>,
    measured_generation: Option<u64>,
}

impl ProgressNormalizer {
    #[must_use]
    pub const fn new(rule: TriggerRule) -> Self {
        Self {
            rule,
            region: None,
            measured_generation: None,
        }
    }

    #[must_use]
    pub fn rule(&self) -> TriggerRule {
        self.rule
    }

    #[must_use]
    pub fn region(&self) -> Option<TriggerRegion> {
        self.region
    }

    #[must_use]
    pub fn is_stale(&self, current_generation: u64) -> bool {
        self.measured_generation != Some(current_generation)
    }

    pub fn refresh(
        &mut self,
        bounds: ElementBounds,
        viewport: Viewport,
        layout_generation: u64,
    ) -> ChoreoResult<TriggerRegion> {
        let region = self.rule.resolve(bounds, viewport)?;
        self.region = Some(region);
        self.measured_generation = Some(layout_generation);
        Ok(region)
    }

    /// Marks the measured region stale; `progress` keeps using it until the
    /// next `refresh`.
    pub fn invalidate(&mut self) {
        self.measured_generation = None;
    }

    /// Returns `None` until the first successful `refresh`.
    #[must_use]
    pub fn progress(&self, offset: f64) -> Option<Progress> {
        self.region.map(|region| compute_progress(offset, region))
    }
}
