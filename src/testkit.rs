//! Test doubles for driving the screen without a GUI toolkit.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::geometry::{Size, Viewport};
use crate::orientation::Rotation;
use crate::screen::ArtDetailScreen;
use crate::view::ArtView;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    ApplyViewport(Viewport),
    RelativeAspectRatio(f32),
    PanZoomEnabled(bool),
    StartSpinner,
    StopSpinner,
    FadeIn(Duration),
    FadeOut(Duration),
    Rotation(Rotation),
}

/// Records every call. Optionally behaves like a pan/zoom view that reports
/// each applied viewport back through the screen's gesture callback.
#[derive(Debug, Default)]
pub struct RecordingView {
    surface: Cell<Size>,
    calls: RefCell<Vec<ViewCall>>,
    echo: RefCell<Option<Weak<ArtDetailScreen>>>,
}

impl RecordingView {
    pub fn new(surface: Size) -> Rc<Self> {
        Rc::new(Self {
            surface: Cell::new(surface),
            ..Self::default()
        })
    }

    pub fn set_surface_size(&self, size: Size) {
        self.surface.set(size);
    }

    pub fn echo_viewport_changes_to(&self, screen: &Rc<ArtDetailScreen>) {
        *self.echo.borrow_mut() = Some(Rc::downgrade(screen));
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&ViewCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    pub fn relative_aspect_ratios(&self) -> Vec<f32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ViewCall::RelativeAspectRatio(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn last_pan_zoom_enabled(&self) -> Option<bool> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            ViewCall::PanZoomEnabled(enabled) => Some(*enabled),
            _ => None,
        })
    }

    fn record(&self, call: ViewCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl ArtView for RecordingView {
    fn apply_viewport(&self, viewport: Viewport) {
        self.record(ViewCall::ApplyViewport(viewport));
        let screen = self.echo.borrow().as_ref().and_then(Weak::upgrade);
        if let Some(screen) = screen {
            screen.on_viewport_changed(viewport);
        }
    }

    fn set_relative_aspect_ratio(&self, ratio: f32) {
        self.record(ViewCall::RelativeAspectRatio(ratio));
    }

    fn set_pan_zoom_enabled(&self, enabled: bool) {
        self.record(ViewCall::PanZoomEnabled(enabled));
    }

    fn start_spinner(&self) {
        self.record(ViewCall::StartSpinner);
    }

    fn stop_spinner(&self) {
        self.record(ViewCall::StopSpinner);
    }

    fn fade_in(&self, duration: Duration) {
        self.record(ViewCall::FadeIn(duration));
    }

    fn fade_out(&self, duration: Duration) {
        self.record(ViewCall::FadeOut(duration));
    }

    fn surface_size(&self) -> Size {
        self.surface.get()
    }

    fn set_rotation(&self, rotation: Rotation) {
        self.record(ViewCall::Rotation(rotation));
    }
}
