pub mod color;
pub mod easing;
pub mod interpolate;
pub mod phase;
pub mod progress;
pub mod shapes;
pub mod stagger;
pub mod types;

pub use color::{Color, ThemePalette};
pub use easing::{EaseDirection, Easing};
pub use interpolate::{
    FnMapper, PhaseInterpolator, PropertyMapper, PropertyTrack, Segment, VisualState, evaluate,
};
pub use phase::{Phase, PhaseSample, PhaseTable};
pub use progress::{
    EdgeAnchor, ProgressNormalizer, TriggerEdge, TriggerRegion, TriggerRule, compute_progress,
};
pub use shapes::ShapeSpec;
pub use stagger::Stagger;
pub use types::{
    ElementBounds, LoopId, Progress, RegionId, ScrollSample, SubscriptionId, TargetId, Viewport,
};
