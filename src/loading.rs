//! Fake-loading fallback and debounced spinner visibility.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::config::LoadingTimings;
use crate::scope::{ScreenScope, TaskSlot};
use crate::view::ArtView;

/// Drives the spinner shown after the user asks for the next artwork.
///
/// `show_fake_loading` is what we want; `spinner_shown` is what the view was
/// last told. Every timer re-checks both when it fires instead of trusting the
/// state it was scheduled under.
#[derive(Clone)]
pub struct LoadingIndicator {
    inner: Rc<LoadingInner>,
}

struct LoadingInner {
    self_weak: Weak<LoadingInner>,
    timings: LoadingTimings,
    view: Rc<dyn ArtView>,
    scope: ScreenScope,
    show_fake_loading: Cell<bool>,
    spinner_shown: Cell<bool>,
    // Set once the fade-in actually started; hiding before that needs no fade.
    spinner_visible: Cell<bool>,
    fake_loading_timeout: TaskSlot,
    show_spinner: TaskSlot,
    finish_fade_out: TaskSlot,
}

impl LoadingIndicator {
    pub fn new(timings: LoadingTimings, view: Rc<dyn ArtView>, scope: ScreenScope) -> Self {
        Self {
            inner: Rc::new_cyclic(|self_weak| LoadingInner {
                self_weak: self_weak.clone(),
                timings,
                view,
                scope,
                show_fake_loading: Cell::new(false),
                spinner_shown: Cell::new(false),
                spinner_visible: Cell::new(false),
                fake_loading_timeout: TaskSlot::new(),
                show_spinner: TaskSlot::new(),
                finish_fade_out: TaskSlot::new(),
            }),
        }
    }

    /// The user asked for the next artwork: show the spinner until artwork
    /// arrives or the timeout elapses, whichever comes first.
    pub fn request_next_artwork(&self) {
        let inner = &self.inner;
        inner.show_fake_loading.set(true);
        inner.update_spinner_visibility();

        let weak = inner.self_weak.clone();
        let task = inner
            .scope
            .schedule(inner.timings.fake_loading_timeout, move || {
                with_inner(&weak, LoadingInner::on_fake_loading_timeout)
            });
        inner.fake_loading_timeout.replace(task);
        debug!(
            timeout = %humantime::format_duration(inner.timings.fake_loading_timeout),
            "fake loading armed"
        );
    }

    /// New artwork is on screen; drop the spinner straight away.
    pub fn artwork_arrived(&self) {
        let inner = &self.inner;
        inner.fake_loading_timeout.cancel();
        inner.show_fake_loading.set(false);
        inner.update_spinner_visibility();
    }

    /// Cancels every pending timer without touching the view.
    ///
    /// The fake-loading request is forgotten too, so the next request after a
    /// stop schedules the spinner again.
    pub fn cancel_all(&self) {
        let inner = &self.inner;
        inner.fake_loading_timeout.cancel();
        inner.show_spinner.cancel();
        inner.finish_fade_out.cancel();
        inner.show_fake_loading.set(false);
        inner.spinner_shown.set(false);
    }

    pub fn is_fake_loading(&self) -> bool {
        self.inner.show_fake_loading.get()
    }

    pub fn is_spinner_shown(&self) -> bool {
        self.inner.spinner_shown.get()
    }

    pub fn has_pending_timeout(&self) -> bool {
        self.inner.fake_loading_timeout.is_pending()
    }

    pub fn has_pending_show(&self) -> bool {
        self.inner.show_spinner.is_pending()
    }
}

fn with_inner(weak: &Weak<LoadingInner>, f: impl FnOnce(&LoadingInner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

impl LoadingInner {
    fn on_fake_loading_timeout(&self) {
        self.fake_loading_timeout.release();
        if !self.show_fake_loading.get() {
            return;
        }
        debug!("fake loading timed out");
        self.show_fake_loading.set(false);
        self.update_spinner_visibility();
    }

    fn update_spinner_visibility(&self) {
        let wanted = self.show_fake_loading.get();
        if wanted == self.spinner_shown.get() {
            return;
        }
        self.spinner_shown.set(wanted);
        self.show_spinner.cancel();

        if wanted {
            let weak = self.self_weak.clone();
            let task = self.scope.schedule(self.timings.spinner_show_delay, move || {
                with_inner(&weak, LoadingInner::on_show_delay_elapsed)
            });
            self.show_spinner.replace(task);
            trace!("spinner show scheduled");
        } else if self.spinner_visible.get() {
            self.view.fade_out(self.timings.spinner_fade_out);
            let weak = self.self_weak.clone();
            let task = self.scope.schedule(self.timings.spinner_fade_out, move || {
                with_inner(&weak, LoadingInner::on_fade_out_finished)
            });
            self.finish_fade_out.replace(task);
        } else {
            trace!("spinner hidden before it appeared");
        }
    }

    fn on_show_delay_elapsed(&self) {
        self.show_spinner.release();
        if !self.spinner_shown.get() {
            return;
        }
        // A fade-out still running from an earlier hide must not stop this spinner.
        self.finish_fade_out.cancel();
        if !self.spinner_visible.get() {
            self.view.start_spinner();
        }
        self.spinner_visible.set(true);
        self.view.fade_in(self.timings.spinner_fade_in);
    }

    fn on_fade_out_finished(&self) {
        self.finish_fade_out.release();
        if self.spinner_shown.get() || !self.spinner_visible.get() {
            return;
        }
        self.spinner_visible.set(false);
        self.view.stop_spinner();
    }
}
