//! The view layer the core drives. Every call is fire-and-forget.

use std::time::Duration;

use tracing::info;

use crate::geometry::{Size, Viewport};
use crate::orientation::Rotation;

pub trait ArtView {
    fn apply_viewport(&self, viewport: Viewport);
    fn set_relative_aspect_ratio(&self, ratio: f32);
    fn set_pan_zoom_enabled(&self, enabled: bool);
    fn start_spinner(&self);
    fn stop_spinner(&self);
    fn fade_in(&self, duration: Duration);
    fn fade_out(&self, duration: Duration);
    /// On-screen size of the pan/zoom surface, used when the wallpaper size is unknown.
    fn surface_size(&self) -> Size;
    fn set_rotation(&self, _rotation: Rotation) {}
}

/// View that only logs what it is asked to do.
#[derive(Debug, Clone)]
pub struct LoggingView {
    surface: Size,
}

impl LoggingView {
    pub fn new(surface: Size) -> Self {
        Self { surface }
    }
}

impl ArtView for LoggingView {
    fn apply_viewport(&self, viewport: Viewport) {
        info!(%viewport, "apply viewport");
    }

    fn set_relative_aspect_ratio(&self, ratio: f32) {
        info!(ratio, "relative aspect ratio");
    }

    fn set_pan_zoom_enabled(&self, enabled: bool) {
        info!(enabled, "pan/zoom");
    }

    fn start_spinner(&self) {
        info!("spinner started");
    }

    fn stop_spinner(&self) {
        info!("spinner stopped");
    }

    fn fade_in(&self, duration: Duration) {
        info!(duration = %humantime::format_duration(duration), "loading fade in");
    }

    fn fade_out(&self, duration: Duration) {
        info!(duration = %humantime::format_duration(duration), "loading fade out");
    }

    fn surface_size(&self) -> Size {
        self.surface
    }

    fn set_rotation(&self, rotation: Rotation) {
        info!(degrees = rotation.degrees(), "artwork rotation");
    }
}
