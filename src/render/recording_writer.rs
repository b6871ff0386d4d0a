use crate::error::ChoreoResult;
use crate::render::{StyleFrame, StyleWriter};

/// Headless writer used by tests and hosts without a render backend.
///
/// It still validates every frame so non-finite values surface before a
/// real backend sees them.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    last_frame: Option<StyleFrame>,
    frames_written: u64,
    total_writes: usize,
}

impl RecordingWriter {
    #[must_use]
    pub fn last_frame(&self) -> Option<&StyleFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    #[must_use]
    pub fn total_writes(&self) -> usize {
        self.total_writes
    }
}

impl StyleWriter for RecordingWriter {
    fn write(&mut self, frame: &StyleFrame) -> ChoreoResult<()> {
        frame.validate()?;
        self.frames_written += 1;
        self.total_writes += frame.len();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
