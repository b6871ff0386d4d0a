//! Host-facing facade: the `Choreographer` context object and its configuration.

mod choreographer;
mod config;
mod frame_pipeline;
mod loops;
mod mount;
mod navigation;
mod observer_registry;
mod region;

pub use choreographer::Choreographer;
pub use config::ChoreographerConfig;
pub use frame_pipeline::FrameReport;
pub use loops::LoopSpec;
pub use mount::Mount;
pub use navigation::NavigationSignal;
pub use region::RegionSpec;
