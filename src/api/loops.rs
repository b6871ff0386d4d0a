use tracing::{debug, trace};

use crate::core::types::{LoopId, TargetId};
use crate::error::ChoreoResult;
use crate::interaction::SeamlessLoop;
use crate::render::StyleWriter;

use super::Choreographer;

/// A loop plus the elements that display its items.
///
/// `items[i]` receives the horizontal offset of loop item `i`. Items beyond
/// the loop length are ignored; a loop without items still ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSpec {
    pub sequence: SeamlessLoop,
    pub items: Vec<TargetId>,
}

impl LoopSpec {
    #[must_use]
    pub fn new(sequence: SeamlessLoop) -> Self {
        Self {
            sequence,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<TargetId>) -> Self {
        self.items = items;
        self
    }
}

impl From<SeamlessLoop> for LoopSpec {
    fn from(sequence: SeamlessLoop) -> Self {
        Self::new(sequence)
    }
}

impl<W: StyleWriter> Choreographer<W> {
    pub fn add_loop(&mut self, spec: impl Into<LoopSpec>) -> LoopId {
        let spec = spec.into();
        let id = LoopId::new(self.loop_alloc.allocate());
        debug!(
            loop_id = id.raw(),
            items = spec.sequence.len(),
            bound = spec.items.len(),
            "loop added"
        );
        self.loops.insert(id, spec);
        self.source.request_refresh();
        id
    }

    pub fn bind_loop_items(&mut self, id: LoopId, items: Vec<TargetId>) -> ChoreoResult<()> {
        let entry = self.loops.get_mut(&id).ok_or_else(|| id.unknown())?;
        entry.items = items;
        trace!(loop_id = id.raw(), bound = entry.items.len(), "loop items bound");
        self.source.request_refresh();
        Ok(())
    }

    pub fn loop_ref(&self, id: LoopId) -> ChoreoResult<&SeamlessLoop> {
        self.loops
            .get(&id)
            .map(|entry| &entry.sequence)
            .ok_or_else(|| id.unknown())
    }

    /// Mutable access for drag input and navigation (`next`, `go_to`, ...).
    pub fn loop_mut(&mut self, id: LoopId) -> ChoreoResult<&mut SeamlessLoop> {
        self.loops
            .get_mut(&id)
            .map(|entry| &mut entry.sequence)
            .ok_or_else(|| id.unknown())
    }

    pub fn remove_loop(&mut self, id: LoopId) -> ChoreoResult<SeamlessLoop> {
        let entry = self.loops.shift_remove(&id).ok_or_else(|| id.unknown())?;
        debug!(loop_id = id.raw(), "loop removed");
        Ok(entry.sequence)
    }

    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }
}
