use crate::error::{ChoreoError, ChoreoResult};
use crate::extensions::{ChoreoEvent, ChoreoObserver, ObserverContext};
use crate::render::StyleWriter;

use super::Choreographer;

impl<W: StyleWriter> Choreographer<W> {
    /// Registers an observer with a unique identifier.
    pub fn add_observer(&mut self, observer: Box<dyn ChoreoObserver>) -> ChoreoResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChoreoError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(ChoreoError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn remove_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    pub(super) fn observer_context(&self) -> ObserverContext {
        ObserverContext {
            viewport: self.config.viewport,
            scroll_offset: self.source.current_offset(),
            layout_generation: self.layout_generation,
            frame_index: self.frame_index,
            transition_in_flight: self.transition_in_flight,
        }
    }

    pub(super) fn emit(&mut self, event: ChoreoEvent) {
        if self.observers.is_empty() {
            return;
        }
        let context = self.observer_context();
        for observer in &mut self.observers {
            observer.on_event(event, context);
        }
    }
}
