use indexmap::IndexMap;

use crate::core::types::{ElementBounds, TargetId};
use crate::error::ChoreoResult;

/// Latest measured geometry of every element the host exposes.
///
/// Targets are typed handles chosen by the host. A target that is not
/// registered simply produces no writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetRegistry {
    bounds: IndexMap<TargetId, ElementBounds>,
}

impl TargetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `target`. Returns `true` when the geometry changed.
    pub fn set(&mut self, target: TargetId, bounds: ElementBounds) -> ChoreoResult<bool> {
        bounds.validate()?;
        Ok(self.bounds.insert(target, bounds) != Some(bounds))
    }

    pub fn remove(&mut self, target: TargetId) -> ChoreoResult<ElementBounds> {
        self.bounds
            .shift_remove(&target)
            .ok_or_else(|| target.unknown())
    }

    #[must_use]
    pub fn get(&self, target: TargetId) -> Option<ElementBounds> {
        self.bounds.get(&target).copied()
    }

    #[must_use]
    pub fn contains(&self, target: TargetId) -> bool {
        self.bounds.contains_key(&target)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}
