use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, ChoreoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChoreoResult<()> {
        if !self.is_valid() {
            return Err(ChoreoError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// One per-frame reading of the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollSample {
    pub offset: f64,
    pub timestamp_ms: f64,
}

impl ScrollSample {
    #[must_use]
    pub const fn new(offset: f64, timestamp_ms: f64) -> Self {
        Self {
            offset,
            timestamp_ms,
        }
    }
}

/// Document-flow geometry of an element, in pixels from the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub top: f64,
    pub height: f64,
}

impl ElementBounds {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    pub fn validate(self) -> ChoreoResult<()> {
        if !self.top.is_finite() || !self.height.is_finite() {
            return Err(ChoreoError::InvalidData(
                "element bounds must be finite".to_owned(),
            ));
        }
        if self.height < 0.0 {
            return Err(ChoreoError::InvalidData(
                "element height must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Normalized scroll position inside a trigger region, always in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(f64);

impl Progress {
    pub const START: Self = Self(0.0);
    pub const END: Self = Self(1.0);

    /// Clamps `value` into `[0, 1]`. NaN maps to `0`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<Progress> for f64 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            pub(crate) const KIND: &'static str = $kind;

            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }

            pub(crate) fn unknown(self) -> ChoreoError {
                ChoreoError::UnknownHandle {
                    kind: Self::KIND,
                    id: self.0,
                }
            }
        }
    };
}

handle_type!(
    /// Typed reference to an element the host lays out and styles.
    TargetId,
    "target"
);
handle_type!(RegionId, "region");
handle_type!(LoopId, "loop");
handle_type!(SubscriptionId, "subscription");

/// Monotonic allocator for handle ids.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementBounds, IdAllocator, Progress, TargetId, Viewport};

    #[test]
    fn progress_clamps_and_rejects_nan() {
        assert_eq!(Progress::new(-3.0).value(), 0.0);
        assert_eq!(Progress::new(7.5).value(), 1.0);
        assert_eq!(Progress::new(f64::NAN).value(), 0.0);
        assert_eq!(Progress::new(0.25).value(), 0.25);
    }

    #[test]
    fn element_bounds_validation() {
        assert!(ElementBounds::new(10.0, 0.0).validate().is_ok());
        assert!(ElementBounds::new(10.0, -1.0).validate().is_err());
        assert!(ElementBounds::new(f64::INFINITY, 1.0).validate().is_err());
        assert_eq!(ElementBounds::new(100.0, 50.0).bottom(), 150.0);
    }

    #[test]
    fn viewport_validation() {
        assert!(Viewport::new(1280, 720).validate().is_ok());
        assert!(Viewport::new(0, 720).validate().is_err());
    }

    #[test]
    fn id_allocator_is_monotonic() {
        let mut ids = IdAllocator::default();
        let a = TargetId::new(ids.allocate());
        let b = TargetId::new(ids.allocate());
        assert!(a < b);
    }
}
