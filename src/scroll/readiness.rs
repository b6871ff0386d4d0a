use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, ChoreoResult};

/// One-shot conditions that measurement-dependent animations wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessSignal {
    FontsReady,
    ImageLoaded,
    TransitionComplete,
}

/// Signals observed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessLedger {
    seen: IndexSet<ReadinessSignal>,
    images_loaded: usize,
}

impl ReadinessLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, signal: ReadinessSignal) {
        if signal == ReadinessSignal::ImageLoaded {
            self.images_loaded += 1;
        }
        self.seen.insert(signal);
    }

    /// Forgets `signal`, e.g. `TransitionComplete` when a new transition starts.
    pub fn clear(&mut self, signal: ReadinessSignal) {
        if signal == ReadinessSignal::ImageLoaded {
            self.images_loaded = 0;
        }
        self.seen.shift_remove(&signal);
    }

    #[must_use]
    pub fn has(&self, signal: ReadinessSignal) -> bool {
        self.seen.contains(&signal)
    }

    #[must_use]
    pub fn images_loaded(&self) -> usize {
        self.images_loaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    Pending,
    Ready,
    /// The bound elapsed first. Still unblocks initialization.
    TimedOut,
}

impl Readiness {
    #[must_use]
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Composable readiness condition.
///
/// Gates are plain data polled against a `ReadinessLedger`; they hold no
/// timers of their own. `Timeout` bounds any inner gate so waiting is
/// best-effort but never unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    Signal(ReadinessSignal),
    Images { expected: usize },
    All(Vec<Gate>),
    Any(Vec<Gate>),
    Timeout { inner: Box<Gate>, after_ms: f64 },
}

impl Gate {
    #[must_use]
    pub fn signal(signal: ReadinessSignal) -> Self {
        Self::Signal(signal)
    }

    #[must_use]
    pub fn fonts() -> Self {
        Self::Signal(ReadinessSignal::FontsReady)
    }

    #[must_use]
    pub fn images(expected: usize) -> Self {
        Self::Images { expected }
    }

    #[must_use]
    pub fn all(gates: impl IntoIterator<Item = Gate>) -> Self {
        Self::All(gates.into_iter().collect())
    }

    #[must_use]
    pub fn any(gates: impl IntoIterator<Item = Gate>) -> Self {
        Self::Any(gates.into_iter().collect())
    }

    #[must_use]
    pub fn with_timeout(self, after_ms: f64) -> Self {
        Self::Timeout {
            inner: Box::new(self),
            after_ms,
        }
    }

    #[must_use]
    pub fn has_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Wraps the gate in `default_ms` unless its root is already bounded.
    #[must_use]
    pub fn bounded(self, default_ms: f64) -> Self {
        if self.has_timeout() {
            self
        } else {
            self.with_timeout(default_ms)
        }
    }

    pub fn validate(&self) -> ChoreoResult<()> {
        match self {
            Self::Signal(_) | Self::Images { .. } => Ok(()),
            Self::All(gates) | Self::Any(gates) => gates.iter().try_for_each(Self::validate),
            Self::Timeout { inner, after_ms } => {
                if !after_ms.is_finite() || *after_ms < 0.0 {
                    return Err(ChoreoError::InvalidData(format!(
                        "gate timeout must be finite and >= 0, got {after_ms}"
                    )));
                }
                inner.validate()
            }
        }
    }

    /// Evaluates the gate `elapsed_ms` after waiting started.
    ///
    /// `All([])` is ready immediately. `Any([])` never resolves on its own.
    #[must_use]
    pub fn poll(&self, ledger: &ReadinessLedger, elapsed_ms: f64) -> Readiness {
        match self {
            Self::Signal(signal) => {
                if ledger.has(*signal) {
                    Readiness::Ready
                } else {
                    Readiness::Pending
                }
            }
            Self::Images { expected } => {
                if ledger.images_loaded() >= *expected {
                    Readiness::Ready
                } else {
                    Readiness::Pending
                }
            }
            Self::All(gates) => {
                let mut timed_out = false;
                for gate in gates {
                    match gate.poll(ledger, elapsed_ms) {
                        Readiness::Pending => return Readiness::Pending,
                        Readiness::TimedOut => timed_out = true,
                        Readiness::Ready => {}
                    }
                }
                if timed_out {
                    Readiness::TimedOut
                } else {
                    Readiness::Ready
                }
            }
            Self::Any(gates) => {
                let mut timed_out = false;
                for gate in gates {
                    match gate.poll(ledger, elapsed_ms) {
                        Readiness::Ready => return Readiness::Ready,
                        Readiness::TimedOut => timed_out = true,
                        Readiness::Pending => {}
                    }
                }
                if timed_out {
                    Readiness::TimedOut
                } else {
                    Readiness::Pending
                }
            }
            Self::Timeout { inner, after_ms } => match inner.poll(ledger, elapsed_ms) {
                Readiness::Pending if elapsed_ms >= *after_ms => Readiness::TimedOut,
                other => other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_waits_for_every_condition() {
        let gate = Gate::all([Gate::fonts(), Gate::images(2)]);
        let mut ledger = ReadinessLedger::new();
        ledger.record(ReadinessSignal::FontsReady);
        ledger.record(ReadinessSignal::ImageLoaded);
        assert_eq!(gate.poll(&ledger, 0.0), Readiness::Pending);
        ledger.record(ReadinessSignal::ImageLoaded);
        assert_eq!(gate.poll(&ledger, 0.0), Readiness::Ready);
    }

    #[test]
    fn timeout_bounds_a_pending_gate() {
        let gate = Gate::signal(ReadinessSignal::TransitionComplete).with_timeout(500.0);
        let ledger = ReadinessLedger::new();
        assert_eq!(gate.poll(&ledger, 499.0), Readiness::Pending);
        assert_eq!(gate.poll(&ledger, 500.0), Readiness::TimedOut);
        assert!(gate.poll(&ledger, 500.0).is_resolved());
    }

    #[test]
    fn clearing_image_signal_resets_the_count() {
        let mut ledger = ReadinessLedger::new();
        ledger.record(ReadinessSignal::ImageLoaded);
        ledger.clear(ReadinessSignal::ImageLoaded);
        assert_eq!(ledger.images_loaded(), 0);
        assert!(!ledger.has(ReadinessSignal::ImageLoaded));
    }
}
