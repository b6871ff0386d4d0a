use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::types::{IdAllocator, SubscriptionId};
use crate::error::ChoreoResult;

type FrameCallback<T> = Box<dyn FnMut(&T)>;

/// Single frame-tick dispatcher.
///
/// Every subscriber is one entry in an ordered table, so there is exactly
/// one loop per frame and cancelling a subscriber is a single removal.
pub struct FrameScheduler<T> {
    callbacks: IndexMap<SubscriptionId, FrameCallback<T>>,
    ids: IdAllocator,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            callbacks: IndexMap::new(),
            ids: IdAllocator::default(),
        }
    }
}

impl<T> fmt::Debug for FrameScheduler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("subscribers", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> FrameScheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.ids.allocate());
        self.callbacks.insert(id, Box::new(callback));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> ChoreoResult<()> {
        self.callbacks
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| id.unknown())
    }

    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.callbacks.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Calls every subscriber once, in registration order.
    pub fn dispatch(&mut self, value: &T) -> usize {
        for callback in self.callbacks.values_mut() {
            callback(value);
        }
        trace!(subscribers = self.callbacks.len(), "frame dispatched");
        self.callbacks.len()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}
