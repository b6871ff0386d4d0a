//! scroll-choreo: headless scroll-progress choreography.
//!
//! Hosts feed scroll offsets, element geometry and lifecycle signals into a
//! [`Choreographer`]. Each display frame it normalizes the scroll offset into
//! per-region progress, maps that progress through phase tables onto visual
//! properties, ticks seamless loops, and hands one batch of style writes to a
//! [`render::StyleWriter`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod scroll;
pub mod telemetry;

pub use api::{Choreographer, ChoreographerConfig};
pub use error::{ChoreoError, ChoreoResult};
