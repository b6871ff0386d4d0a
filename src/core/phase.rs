use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::types::Progress;
use crate::error::{ChoreoError, ChoreoResult};

/// Named sub-interval of the `[0, 1]` progress domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

impl Phase {
    #[must_use]
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn contains(&self, progress: f64) -> bool {
        self.start <= progress && progress <= self.end
    }

    /// Local progress inside this phase, clamped into `[0, 1]`.
    ///
    /// A zero-length phase counts as complete as soon as progress reaches it.
    #[must_use]
    pub fn local(&self, progress: f64) -> f64 {
        let length = self.length();
        if length <= 0.0 {
            return if progress >= self.start { 1.0 } else { 0.0 };
        }
        ((progress - self.start) / length).clamp(0.0, 1.0)
    }
}

/// Where a progress value lands inside a phase table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSample<'a> {
    pub index: usize,
    pub name: &'a str,
    pub local: f64,
}

/// Ordered phases that cover `[0, 1]` with no gaps and no overlap.
///
/// Boundaries are compared exactly. `from_breakpoints` builds tables whose
/// shared boundaries are the same float by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Phase>", into = "Vec<Phase>")]
pub struct PhaseTable {
    phases: SmallVec<[Phase; 4]>,
}

impl PhaseTable {
    pub fn new(phases: impl IntoIterator<Item = Phase>) -> ChoreoResult<Self> {
        let phases: SmallVec<[Phase; 4]> = phases.into_iter().collect();
        validate_phases(&phases)?;
        Ok(Self { phases })
    }

    /// Single phase spanning the whole domain.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        let mut phases = SmallVec::new();
        phases.push(Phase::new(name, 0.0, 1.0));
        Self { phases }
    }

    /// Builds a table from `(name, end)` pairs; each phase starts where the previous ended.
    pub fn from_breakpoints<S: AsRef<str>>(breakpoints: &[(S, f64)]) -> ChoreoResult<Self> {
        let mut start = 0.0;
        let mut phases = SmallVec::<[Phase; 4]>::new();
        for (name, end) in breakpoints {
            phases.push(Phase::new(name.as_ref(), start, *end));
            start = *end;
        }
        validate_phases(&phases)?;
        Ok(Self { phases })
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.phases.iter().position(|phase| phase.name == name)
    }

    /// Internal boundaries between consecutive phases, in order.
    pub fn boundaries(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.phases
            .windows(2)
            .enumerate()
            .map(|(index, pair)| (index, pair[0].end))
    }

    /// First phase containing `progress`.
    #[must_use]
    pub fn locate(&self, progress: Progress) -> PhaseSample<'_> {
        let value = progress.value();
        let index = self
            .phases
            .iter()
            .position(|phase| phase.contains(value))
            .unwrap_or(self.phases.len() - 1);
        self.sample_in(index, progress)
    }

    /// Samples a specific phase regardless of which phase `locate` would pick.
    ///
    /// Out-of-range indices sample the last phase.
    #[must_use]
    pub fn sample_in(&self, index: usize, progress: Progress) -> PhaseSample<'_> {
        let index = index.min(self.phases.len() - 1);
        let phase = &self.phases[index];
        PhaseSample {
            index,
            name: &phase.name,
            local: phase.local(progress.value()),
        }
    }
}

fn validate_phases(phases: &[Phase]) -> ChoreoResult<()> {
    let (Some(first), Some(last)) = (phases.first(), phases.last()) else {
        return Err(ChoreoError::InvalidPhaseTable(
            "table must contain at least one phase".to_owned(),
        ));
    };

    for phase in phases {
        if !phase.start.is_finite() || !phase.end.is_finite() {
            return Err(ChoreoError::InvalidPhaseTable(format!(
                "phase `{}` has non-finite bounds",
                phase.name
            )));
        }
        if phase.start > phase.end {
            return Err(ChoreoError::InvalidPhaseTable(format!(
                "phase `{}` starts after it ends ({} > {})",
                phase.name, phase.start, phase.end
            )));
        }
    }

    if first.start != 0.0 {
        return Err(ChoreoError::InvalidPhaseTable(format!(
            "first phase `{}` must start at 0, starts at {}",
            first.name, first.start
        )));
    }
    if last.end != 1.0 {
        return Err(ChoreoError::InvalidPhaseTable(format!(
            "last phase `{}` must end at 1, ends at {}",
            last.name, last.end
        )));
    }

    for pair in phases.windows(2) {
        if pair[0].end != pair[1].start {
            return Err(ChoreoError::InvalidPhaseTable(format!(
                "phase `{}` ends at {} but `{}` starts at {}",
                pair[0].name, pair[0].end, pair[1].name, pair[1].start
            )));
        }
    }

    Ok(())
}

impl TryFrom<Vec<Phase>> for PhaseTable {
    type Error = ChoreoError;

    fn try_from(phases: Vec<Phase>) -> Result<Self, Self::Error> {
        Self::new(phases)
    }
}

impl From<PhaseTable> for Vec<Phase> {
    fn from(table: PhaseTable) -> Self {
        table.phases.into_vec()
    }
}
