mod frame;
mod recording_writer;
mod target_registry;

pub use frame::{StyleFrame, StyleWrite};
pub use recording_writer::RecordingWriter;
pub use target_registry::TargetRegistry;

use crate::error::ChoreoResult;

/// Contract implemented by any style backend.
///
/// Backends receive one fully computed `StyleFrame` per tick, so the
/// choreography logic never touches element APIs directly.
pub trait StyleWriter {
    fn write(&mut self, frame: &StyleFrame) -> ChoreoResult<()>;
}
