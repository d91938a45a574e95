use tracing::{debug, warn};

use crate::geometry::ViewportId;
use crate::observable::{Observable, SubscriptionId};

/// Whether the displayed image is mid-transition to a new artwork.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwitchState {
    #[default]
    Idle,
    InProgress(ViewportId),
    Done(ViewportId),
}

impl SwitchState {
    pub fn viewport_id(&self) -> Option<ViewportId> {
        match *self {
            SwitchState::Idle => None,
            SwitchState::InProgress(id) | SwitchState::Done(id) => Some(id),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, SwitchState::InProgress(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, SwitchState::Done(_))
    }

    pub fn is_expected_transition(&self, next: &SwitchState) -> bool {
        match (*self, *next) {
            (SwitchState::Idle, SwitchState::InProgress(_)) => true,
            (SwitchState::InProgress(a), SwitchState::Done(b)) => a == b,
            (SwitchState::Done(_), SwitchState::Idle) => true,
            (SwitchState::Done(_), SwitchState::InProgress(_)) => true,
            _ => false,
        }
    }
}

/// Typed switch-state variable fed by the artwork-loading pipeline.
///
/// The coordinator never originates transitions; it records what the
/// pipeline reports and broadcasts changes to its observers.
#[derive(Debug, Clone, Default)]
pub struct PhotoSwitchCoordinator {
    state: Observable<SwitchState>,
}

impl PhotoSwitchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SwitchState {
        self.state.get()
    }

    pub fn set(&self, next: SwitchState) -> bool {
        let current = self.state.get();
        if current == next {
            return false;
        }
        if current.is_expected_transition(&next) {
            debug!(from = ?current, to = ?next, "switch state");
        } else {
            warn!(from = ?current, to = ?next, "unexpected switch transition");
        }
        self.state.set(next)
    }

    pub fn begin(&self, id: ViewportId) -> bool {
        self.set(SwitchState::InProgress(id))
    }

    pub fn finish(&self, id: ViewportId) -> bool {
        self.set(SwitchState::Done(id))
    }

    pub fn reset(&self) -> bool {
        self.set(SwitchState::Idle)
    }

    pub fn subscribe(&self, observer: impl Fn(&SwitchState) + 'static) -> SubscriptionId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.subscriber_count()
    }
}
