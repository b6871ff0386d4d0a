//! Scroll input side: the offset source, the frame dispatcher and readiness gates.

mod readiness;
mod scheduler;
mod source;

pub use readiness::{Gate, Readiness, ReadinessLedger, ReadinessSignal};
pub use scheduler::FrameScheduler;
pub use source::{ScrollMode, ScrollSource};
