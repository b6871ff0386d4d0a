use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extensions::ChoreoEvent;
use crate::render::StyleWriter;
use crate::scroll::ReadinessSignal;

use super::Choreographer;

/// Page-transition broadcast. Two payload-free signals, no acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationSignal {
    TransitionStart,
    TransitionComplete,
}

impl<W: StyleWriter> Choreographer<W> {
    /// Geometry measured mid-transition is wrong, so refreshes wait for completion.
    pub fn navigation(&mut self, signal: NavigationSignal) {
        debug!(?signal, "navigation signal");
        match signal {
            NavigationSignal::TransitionStart => {
                self.transition_in_flight = true;
                self.ledger.clear(ReadinessSignal::TransitionComplete);
                self.emit(ChoreoEvent::TransitionStarted);
            }
            NavigationSignal::TransitionComplete => {
                self.transition_in_flight = false;
                self.ledger.record(ReadinessSignal::TransitionComplete);
                self.emit(ChoreoEvent::TransitionCompleted);
                self.invalidate_layout();
            }
        }
    }

    #[must_use]
    pub fn is_transition_in_flight(&self) -> bool {
        self.transition_in_flight
    }

    /// Records a readiness signal. Fonts and images can change page height,
    /// so both also invalidate layout.
    pub fn signal(&mut self, signal: ReadinessSignal) {
        debug!(?signal, "readiness signal");
        if signal == ReadinessSignal::TransitionComplete {
            self.navigation(NavigationSignal::TransitionComplete);
            return;
        }
        self.ledger.record(signal);
        self.invalidate_layout();
    }
}
