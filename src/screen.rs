//! Full-screen art detail: wires the shared stores to one view.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::config::Configuration;
use crate::geometry::{AspectRatio, Size, Viewport, ViewportId};
use crate::loading::LoadingIndicator;
use crate::observable::{Observable, SubscriptionId};
use crate::orientation::read_rotation_blocking;
use crate::reconciler::{AspectRatioReconciler, ResetOutcome};
use crate::scope::{ScreenScope, TaskSlot};
use crate::switching::{PhotoSwitchCoordinator, SwitchState};
use crate::view::ArtView;
use crate::viewport_store::{ViewportChange, ViewportStore};

/// Process-wide state shared by every screen showing the current artwork.
#[derive(Debug, Clone)]
pub struct ArtContext {
    pub viewports: ViewportStore,
    pub switching: PhotoSwitchCoordinator,
    /// Whether an art detail screen is currently started.
    pub detail_open: Observable<bool>,
}

impl Default for ArtContext {
    fn default() -> Self {
        Self {
            viewports: ViewportStore::new(),
            switching: PhotoSwitchCoordinator::new(),
            detail_open: Observable::new(false),
        }
    }
}

impl ArtContext {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct ArtDetailScreen {
    context: ArtContext,
    view: Rc<dyn ArtView>,
    scope: ScreenScope,
    loading: LoadingIndicator,
    reconciler: RefCell<AspectRatioReconciler>,
    read_orientation: bool,
    current_viewport_id: Cell<ViewportId>,
    // Set while a store value is being pushed into the view, so the view's own
    // change callback does not write it straight back.
    guard_viewport_change: Cell<bool>,
    // Set while this screen's own gesture is being broadcast.
    publishing: Cell<bool>,
    viewport_subscription: Cell<Option<SubscriptionId>>,
    switch_subscription: Cell<Option<SubscriptionId>>,
    orientation_task: TaskSlot,
    started: Cell<bool>,
}

impl ArtDetailScreen {
    /// Subscribes to the shared stores and syncs with the current switch state.
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    pub fn open(context: ArtContext, view: Rc<dyn ArtView>, config: &Configuration) -> Rc<Self> {
        let scope = ScreenScope::new();
        let loading = LoadingIndicator::new(config.loading, Rc::clone(&view), scope.clone());
        let screen = Rc::new(Self {
            context,
            view,
            scope,
            loading,
            reconciler: RefCell::new(AspectRatioReconciler::new()),
            read_orientation: config.read_orientation,
            current_viewport_id: Cell::new(ViewportId::default()),
            guard_viewport_change: Cell::new(false),
            publishing: Cell::new(false),
            viewport_subscription: Cell::new(None),
            switch_subscription: Cell::new(None),
            orientation_task: TaskSlot::new(),
            started: Cell::new(false),
        });

        let weak = Rc::downgrade(&screen);
        let id = screen
            .context
            .viewports
            .add_observer(move |change: &ViewportChange| {
                with_screen(&weak, |s| s.on_viewport_broadcast(change))
            });
        screen.viewport_subscription.set(Some(id));

        let weak = Rc::downgrade(&screen);
        let id = screen
            .context
            .switching
            .subscribe(move |state: &SwitchState| with_screen(&weak, |s| s.on_switch_state(state)));
        screen.switch_subscription.set(Some(id));

        let current = screen.context.switching.current();
        screen.on_switch_state(&current);
        debug!(viewport_id = %screen.current_viewport_id.get(), "art detail opened");
        screen
    }

    pub fn context(&self) -> &ArtContext {
        &self.context
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn current_viewport_id(&self) -> ViewportId {
        self.current_viewport_id.get()
    }

    pub fn pending_reset(&self) -> bool {
        self.reconciler.borrow().pending_reset()
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_closed()
    }

    pub fn on_wallpaper_size(&self, size: Size) {
        let aspect = if size.is_known() {
            AspectRatio::of(size)
        } else {
            AspectRatio::of(self.view.surface_size())
        };
        self.reconciler.borrow_mut().set_wallpaper_aspect(aspect);
        self.reset_proxy_viewport();
    }

    pub fn on_artwork_size(&self, size: Size) {
        self.reconciler
            .borrow_mut()
            .set_artwork_aspect(AspectRatio::of(size));
        self.reset_proxy_viewport();
    }

    /// Single entry point for size changes; applies, defers or ignores the reset.
    pub fn reset_proxy_viewport(&self) {
        let switch = self.context.switching.current();
        let outcome = self.reconciler.borrow_mut().reset_proxy_viewport(&switch);
        self.apply_outcome(outcome);
    }

    /// Pan/zoom gesture callback from the view.
    pub fn on_viewport_changed(&self, viewport: Viewport) {
        if self.guard_viewport_change.get() {
            trace!(%viewport, "suppressed echo of store viewport");
            return;
        }
        if self.is_closed() {
            return;
        }
        self.publishing.set(true);
        self.context
            .viewports
            .set_viewport(self.current_viewport_id.get(), viewport, true);
        self.publishing.set(false);
    }

    pub fn on_next_artwork(&self) {
        self.loading.request_next_artwork();
    }

    /// New artwork is displayed; `source` is the decoded file, when known.
    pub fn on_artwork_loaded(self: &Rc<Self>, source: Option<PathBuf>) {
        self.loading.artwork_arrived();
        let Some(path) = source.filter(|_| self.read_orientation) else {
            return;
        };

        // A newer load replaces this task, so only the latest read reaches the view.
        let weak = Rc::downgrade(self);
        let task = self.scope.spawn(async move {
            let rotation = match read_rotation_blocking(path.clone()).await {
                Ok(rotation) => rotation,
                Err(err) => {
                    warn!("failed to read orientation of {}: {err:#}", path.display());
                    return;
                }
            };
            with_screen(&weak, |s| {
                s.orientation_task.release();
                s.view.set_rotation(rotation);
            });
        });
        self.orientation_task.replace(task);
    }

    pub fn on_start(&self) {
        self.started.set(true);
        self.context.detail_open.set(true);
    }

    /// The screen is no longer visible; pending timers and reads are dropped.
    pub fn on_stop(&self) {
        self.loading.cancel_all();
        self.orientation_task.cancel();
        self.started.set(false);
        self.context.detail_open.set(false);
    }

    /// Unsubscribes from the shared stores and cancels every pending task.
    pub fn close(&self) {
        if let Some(id) = self.viewport_subscription.take() {
            self.context.viewports.remove_observer(id);
        }
        if let Some(id) = self.switch_subscription.take() {
            self.context.switching.unsubscribe(id);
        }
        if self.scope.is_closed() {
            return;
        }
        self.loading.cancel_all();
        self.orientation_task.cancel();
        self.scope.close();
        if self.started.replace(false) {
            self.context.detail_open.set(false);
        }
        debug!("art detail closed");
    }

    fn on_switch_state(&self, state: &SwitchState) {
        if let Some(id) = state.viewport_id() {
            self.current_viewport_id.set(id);
        }
        self.view.set_pan_zoom_enabled(state.is_done());
        let outcome = self.reconciler.borrow_mut().on_switch_state(state);
        self.apply_outcome(outcome);
    }

    fn on_viewport_broadcast(&self, change: &ViewportChange) {
        if self.publishing.get() {
            return;
        }
        let current = self.current_viewport_id.get();
        if change.id != current {
            trace!(stale = %change.id, %current, "ignoring viewport for stale epoch");
            return;
        }
        let viewport = self.context.viewports.get_viewport(current);
        self.guard_viewport_change.set(true);
        self.view.apply_viewport(viewport);
        self.guard_viewport_change.set(false);
    }

    fn apply_outcome(&self, outcome: ResetOutcome) {
        if let ResetOutcome::Applied(ratio) = outcome {
            self.view.set_relative_aspect_ratio(ratio);
        }
    }
}

impl fmt::Debug for ArtDetailScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtDetailScreen")
            .field("viewport_id", &self.current_viewport_id.get())
            .field("guarded", &self.guard_viewport_change.get())
            .field("publishing", &self.publishing.get())
            .field("closed", &self.scope.is_closed())
            .finish()
    }
}

impl Drop for ArtDetailScreen {
    fn drop(&mut self) {
        self.close();
    }
}

fn with_screen(weak: &Weak<ArtDetailScreen>, f: impl FnOnce(&ArtDetailScreen)) {
    if let Some(screen) = weak.upgrade() {
        f(&screen);
    }
}
