use tracing::{debug, warn};

use crate::core::types::{LoopId, RegionId, SubscriptionId};
use crate::error::ChoreoResult;
use crate::render::StyleWriter;

use super::{Choreographer, LoopSpec, RegionSpec};

/// Every handle acquired by one component setup.
///
/// Pass it back to `Choreographer::unmount`, which consumes it so teardown
/// runs exactly once. Dropping a non-empty `Mount` without unmounting leaks
/// its regions, loops and subscribers and is logged as a warning.
#[derive(Debug, Default)]
#[must_use = "a mount must be passed to `Choreographer::unmount` on teardown"]
pub struct Mount {
    regions: Vec<RegionId>,
    loops: Vec<LoopId>,
    subscriptions: Vec<SubscriptionId>,
    released: bool,
}

impl Mount {
    pub fn track_region(&mut self, id: RegionId) {
        self.regions.push(id);
    }

    pub fn track_loop(&mut self, id: LoopId) {
        self.loops.push(id);
    }

    pub fn track_subscription(&mut self, id: SubscriptionId) {
        self.subscriptions.push(id);
    }

    #[must_use]
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    #[must_use]
    pub fn loops(&self) -> &[LoopId] {
        &self.loops
    }

    #[must_use]
    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.loops.is_empty() && self.subscriptions.is_empty()
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        if !self.released && !self.is_empty() {
            warn!(
                regions = self.regions.len(),
                loops = self.loops.len(),
                subscriptions = self.subscriptions.len(),
                "mount dropped without unmount, handles leaked"
            );
        }
    }
}

impl<W: StyleWriter> Choreographer<W> {
    /// Registers a component's regions and loops as one unit.
    ///
    /// If any region is rejected, everything added so far is removed again
    /// and the error is returned.
    pub fn mount(&mut self, regions: Vec<RegionSpec>, loops: Vec<LoopSpec>) -> ChoreoResult<Mount> {
        let mut mount = Mount::default();
        for spec in regions {
            match self.add_region(spec) {
                Ok(id) => mount.track_region(id),
                Err(err) => {
                    if let Err(rollback) = self.release(&mut mount) {
                        warn!(error = %rollback, "mount rollback left a stale handle");
                    }
                    return Err(err);
                }
            }
        }
        for spec in loops {
            mount.track_loop(self.add_loop(spec));
        }
        debug!(
            regions = mount.regions.len(),
            loops = mount.loops.len(),
            "component mounted"
        );
        Ok(mount)
    }

    /// Releases every handle in `mount`.
    ///
    /// Handles already removed elsewhere are skipped; the first such error
    /// is returned after everything else has been released.
    pub fn unmount(&mut self, mut mount: Mount) -> ChoreoResult<()> {
        let result = self.release(&mut mount);
        debug!("component unmounted");
        result
    }

    fn release(&mut self, mount: &mut Mount) -> ChoreoResult<()> {
        let mut first_error = None;
        for id in std::mem::take(&mut mount.regions) {
            if let Err(err) = self.remove_region(id) {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        for id in std::mem::take(&mut mount.loops) {
            if let Err(err) = self.remove_loop(id) {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        for id in std::mem::take(&mut mount.subscriptions) {
            if let Err(err) = self.unsubscribe(id) {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        mount.released = true;
        first_error.map_or(Ok(()), Err)
    }
}
