use serde::{Deserialize, Serialize};

use crate::core::types::{RegionId, Viewport};
use crate::scroll::Readiness;

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub viewport: Viewport,
    pub scroll_offset: f64,
    pub layout_generation: u64,
    pub frame_index: u64,
    pub transition_in_flight: bool,
}

/// Event stream exposed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChoreoEvent {
    ScrollDispatched { offset: f64, subscribers: usize },
    LayoutInvalidated { generation: u64 },
    RegionRefreshed {
        region: RegionId,
        start_boundary: f64,
        end_boundary: f64,
    },
    TransitionStarted,
    TransitionCompleted,
    GateResolved {
        region: RegionId,
        readiness: Readiness,
    },
    FrameWritten { frame_index: u64, writes: usize },
}

/// Hook interface for diagnostics and host-side side effects.
///
/// Observers see events and context but cannot mutate the choreographer.
pub trait ChoreoObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChoreoEvent, context: ObserverContext);
}
