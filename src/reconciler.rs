use tracing::{debug, trace};

use crate::geometry::AspectRatio;
use crate::switching::SwitchState;

/// Result of one `reset_proxy_viewport` attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetOutcome {
    /// One of the aspect ratios is still unknown.
    NotReady,
    /// A switch is in progress; the reset replays once it is done.
    Deferred,
    /// A new relative aspect ratio must be applied to the view.
    Applied(f32),
    /// The relative aspect ratio matches what the view already has.
    Unchanged(f32),
    /// Nothing was requested.
    Idle,
}

/// Tracks the wallpaper and artwork aspect ratios and derives the proxy
/// viewport's relative aspect ratio from them.
#[derive(Debug, Clone, Default)]
pub struct AspectRatioReconciler {
    wallpaper_aspect: AspectRatio,
    artwork_aspect: AspectRatio,
    pending_reset: bool,
    applied: Option<f32>,
}

impl AspectRatioReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_wallpaper_aspect(&mut self, aspect: AspectRatio) {
        self.wallpaper_aspect = aspect;
    }

    pub fn set_artwork_aspect(&mut self, aspect: AspectRatio) {
        self.artwork_aspect = aspect;
    }

    pub fn wallpaper_aspect(&self) -> AspectRatio {
        self.wallpaper_aspect
    }

    pub fn artwork_aspect(&self) -> AspectRatio {
        self.artwork_aspect
    }

    pub fn pending_reset(&self) -> bool {
        self.pending_reset
    }

    /// Last relative aspect ratio handed to the view.
    pub fn applied(&self) -> Option<f32> {
        self.applied
    }

    pub fn reset_proxy_viewport(&mut self, switch: &SwitchState) -> ResetOutcome {
        let Some(relative) = self.artwork_aspect.relative_to(self.wallpaper_aspect) else {
            trace!(
                wallpaper = self.wallpaper_aspect.value(),
                artwork = self.artwork_aspect.value(),
                "aspect ratio not ready"
            );
            return ResetOutcome::NotReady;
        };

        self.pending_reset = false;
        if switch.is_in_progress() {
            debug!(?switch, "deferring viewport reset until switch completes");
            self.pending_reset = true;
            return ResetOutcome::Deferred;
        }

        if self.applied == Some(relative) {
            return ResetOutcome::Unchanged(relative);
        }
        self.applied = Some(relative);
        debug!(relative, "relative aspect ratio");
        ResetOutcome::Applied(relative)
    }

    /// Replays a deferred reset once the switch is done, using the latest sizes.
    pub fn on_switch_state(&mut self, switch: &SwitchState) -> ResetOutcome {
        if switch.is_done() && self.pending_reset {
            return self.reset_proxy_viewport(switch);
        }
        ResetOutcome::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, ViewportId};

    fn aspect(w: f32, h: f32) -> AspectRatio {
        Size::new(w, h).aspect_ratio()
    }

    #[test]
    fn unknown_ratio_is_not_ready_and_keeps_pending_flag() {
        let mut r = AspectRatioReconciler::new();
        r.set_artwork_aspect(aspect(1000.0, 500.0));
        r.set_wallpaper_aspect(aspect(400.0, 400.0));
        let in_progress = SwitchState::InProgress(ViewportId(1));
        assert_eq!(r.reset_proxy_viewport(&in_progress), ResetOutcome::Deferred);
        assert!(r.pending_reset());

        r.set_artwork_aspect(AspectRatio::UNKNOWN);
        assert_eq!(r.reset_proxy_viewport(&SwitchState::Idle), ResetOutcome::NotReady);
        assert!(r.pending_reset());
    }

    #[test]
    fn idle_applies_ratio_once() {
        let mut r = AspectRatioReconciler::new();
        r.set_artwork_aspect(aspect(1000.0, 500.0));
        r.set_wallpaper_aspect(aspect(400.0, 400.0));

        assert_eq!(r.reset_proxy_viewport(&SwitchState::Idle), ResetOutcome::Applied(2.0));
        assert!(!r.pending_reset());
        assert_eq!(r.reset_proxy_viewport(&SwitchState::Idle), ResetOutcome::Unchanged(2.0));
        assert!(!r.pending_reset());
        assert_eq!(r.applied(), Some(2.0));
    }

    #[test]
    fn deferred_reset_replays_latest_sizes_on_done() {
        let id = ViewportId(5);
        let mut r = AspectRatioReconciler::new();
        r.set_artwork_aspect(aspect(1000.0, 500.0));
        r.set_wallpaper_aspect(aspect(400.0, 400.0));
        assert_eq!(r.reset_proxy_viewport(&SwitchState::Idle), ResetOutcome::Applied(2.0));

        let in_progress = SwitchState::InProgress(id);
        r.set_artwork_aspect(aspect(1000.0, 250.0));
        assert_eq!(r.reset_proxy_viewport(&in_progress), ResetOutcome::Deferred);
        r.set_wallpaper_aspect(aspect(500.0, 400.0));
        assert_eq!(r.reset_proxy_viewport(&in_progress), ResetOutcome::Deferred);
        assert_eq!(r.on_switch_state(&in_progress), ResetOutcome::Idle);

        assert_eq!(r.on_switch_state(&SwitchState::Done(id)), ResetOutcome::Applied(3.2));
        assert!(!r.pending_reset());
        assert_eq!(r.on_switch_state(&SwitchState::Done(id)), ResetOutcome::Idle);
    }

    #[test]
    fn done_without_pending_reset_does_nothing() {
        let mut r = AspectRatioReconciler::new();
        r.set_artwork_aspect(aspect(3.0, 2.0));
        r.set_wallpaper_aspect(aspect(3.0, 2.0));
        assert_eq!(r.on_switch_state(&SwitchState::Done(ViewportId(0))), ResetOutcome::Idle);
        assert_eq!(r.applied(), None);
    }
}
