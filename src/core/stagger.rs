use serde::{Deserialize, Serialize};

use crate::core::types::Progress;
use crate::error::{ChoreoError, ChoreoResult};

/// Spreads one region progress across `count` items revealed in sequence.
///
/// Used for split-text and line reveals. `overlap` is the share of an item's
/// window that runs concurrently with the next item: `0` reveals items
/// strictly one after another, values close to `1` reveal them almost together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    count: usize,
    overlap: f64,
}

impl Stagger {
    pub fn new(count: usize, overlap: f64) -> ChoreoResult<Self> {
        if count == 0 {
            return Err(ChoreoError::InvalidData(
                "stagger needs at least one item".to_owned(),
            ));
        }
        if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
            return Err(ChoreoError::InvalidData(format!(
                "stagger overlap must be in [0, 1), got {overlap}"
            )));
        }
        Ok(Self { count, overlap })
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// Share of the region each item animates over.
    #[must_use]
    pub fn item_duration(self) -> f64 {
        let gaps = (self.count - 1) as f64;
        1.0 / (1.0 + gaps * (1.0 - self.overlap))
    }

    /// Offset between consecutive item start points.
    #[must_use]
    pub fn step(self) -> f64 {
        self.item_duration() * (1.0 - self.overlap)
    }

    /// Local progress of item `index`. Out-of-range indices clamp to the last item.
    #[must_use]
    pub fn item_progress(self, index: usize, progress: Progress) -> Progress {
        let index = index.min(self.count - 1);
        if index == self.count - 1 && progress.value() >= 1.0 {
            return Progress::END;
        }
        let start = index as f64 * self.step();
        Progress::new((progress.value() - start) / self.item_duration())
    }

    /// Local progress for every item, in order.
    #[must_use]
    pub fn all(self, progress: Progress) -> Vec<Progress> {
        (0..self.count)
            .map(|index| self.item_progress(index, progress))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Stagger;
    use crate::core::types::Progress;

    #[test]
    fn sequential_items_split_the_region_evenly() {
        let stagger = Stagger::new(4, 0.0).expect("valid");
        assert!((stagger.item_duration() - 0.25).abs() < 1e-12);
        let mid = stagger.all(Progress::new(0.5));
        assert_eq!(mid[0], Progress::END);
        assert_eq!(mid[1], Progress::END);
        assert_eq!(mid[2], Progress::START);
        assert_eq!(mid[3], Progress::START);
    }

    #[test]
    fn first_starts_at_zero_and_last_completes_at_one() {
        let stagger = Stagger::new(5, 0.6).expect("valid");
        assert_eq!(stagger.item_progress(0, Progress::START), Progress::START);
        assert_eq!(stagger.item_progress(4, Progress::END), Progress::END);
        assert!(stagger.item_progress(0, Progress::new(0.01)).value() > 0.0);
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(Stagger::new(0, 0.5).is_err());
        assert!(Stagger::new(3, 1.0).is_err());
        assert!(Stagger::new(3, -0.1).is_err());
    }
}
