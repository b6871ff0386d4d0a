//! Optional hooks that sit beside the frame pipeline.

mod observers;

pub use observers::{ChoreoEvent, ChoreoObserver, ObserverContext};
