use serde::{Deserialize, Serialize};

use crate::core::interpolate::VisualState;
use crate::core::types::TargetId;
use crate::error::{ChoreoError, ChoreoResult};

/// Computed properties for one target element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleWrite {
    pub target: TargetId,
    pub state: VisualState,
}

impl StyleWrite {
    #[must_use]
    pub fn new(target: TargetId, state: VisualState) -> Self {
        Self { target, state }
    }
}

/// Every style write produced by one frame tick.
///
/// Writes target disjoint elements, so their order carries no meaning beyond
/// determinism: regions first in insertion order, then loop items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleFrame {
    pub frame_index: u64,
    pub timestamp_ms: f64,
    pub writes: Vec<StyleWrite>,
}

impl StyleFrame {
    #[must_use]
    pub fn new(frame_index: u64, timestamp_ms: f64) -> Self {
        Self {
            frame_index,
            timestamp_ms,
            writes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_write(mut self, write: StyleWrite) -> Self {
        self.writes.push(write);
        self
    }

    pub fn push(&mut self, target: TargetId, state: VisualState) {
        self.writes.push(StyleWrite::new(target, state));
    }

    pub fn validate(&self) -> ChoreoResult<()> {
        if !self.timestamp_ms.is_finite() {
            return Err(ChoreoError::InvalidData(format!(
                "frame timestamp must be finite, got {}",
                self.timestamp_ms
            )));
        }
        for write in &self.writes {
            write.state.validate()?;
        }
        Ok(())
    }

    /// Last state written to `target` in this frame.
    #[must_use]
    pub fn state_for(&self, target: TargetId) -> Option<&VisualState> {
        self.writes
            .iter()
            .rev()
            .find(|write| write.target == target)
            .map(|write| &write.state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
