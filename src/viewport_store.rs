use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::geometry::{Viewport, ViewportId};
use crate::observable::{SubscriptionId, Subscribers};

/// Broadcast payload for every `set_viewport` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportChange {
    pub id: ViewportId,
    pub viewport: Viewport,
    /// `true` when the value came from a pan/zoom gesture.
    pub from_user: bool,
}

/// Process-wide viewport per artwork epoch, shared by every screen.
///
/// Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct ViewportStore {
    inner: Rc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    viewports: RefCell<HashMap<ViewportId, Viewport>>,
    observers: Subscribers<ViewportChange>,
}

impl fmt::Debug for ViewportStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportStore")
            .field("epochs", &self.inner.viewports.borrow().len())
            .field("observers", &self.inner.observers.len())
            .finish()
    }
}

impl ViewportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `viewport` under `id` and delivers it to every observer,
    /// including the one whose gesture produced it.
    ///
    /// No validation happens here: a `Viewport` can only be built through its
    /// checked constructors, so it is always a non-empty rectangle in `[0, 1]`.
    pub fn set_viewport(&self, id: ViewportId, viewport: Viewport, from_user: bool) {
        self.inner.viewports.borrow_mut().insert(id, viewport);
        trace!(%id, %viewport, from_user, "viewport stored");
        self.inner.observers.notify(&ViewportChange {
            id,
            viewport,
            from_user,
        });
    }

    pub fn get_viewport(&self, id: ViewportId) -> Viewport {
        self.inner
            .viewports
            .borrow()
            .get(&id)
            .copied()
            .unwrap_or(Viewport::FULL)
    }

    pub fn add_observer(&self, observer: impl Fn(&ViewportChange) + 'static) -> SubscriptionId {
        self.inner.observers.subscribe(observer)
    }

    pub fn remove_observer(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn rect(l: f32, t: f32, r: f32, b: f32) -> Viewport {
        Viewport::try_new(l, t, r, b).unwrap()
    }

    #[test]
    fn unknown_epoch_reads_full_frame() {
        let store = ViewportStore::new();
        assert_eq!(store.get_viewport(ViewportId(3)), Viewport::FULL);
    }

    #[test]
    fn set_then_get_returns_the_same_rectangle() {
        let store = ViewportStore::new();
        let r = rect(0.125, 0.25, 0.625, 0.875);
        store.set_viewport(ViewportId(1), r, true);
        assert_eq!(store.get_viewport(ViewportId(1)), r);
        assert_eq!(store.get_viewport(ViewportId(2)), Viewport::FULL);

        let r2 = rect(0.0, 0.0, 0.5, 0.5);
        store.set_viewport(ViewportId(1), r2, false);
        assert_eq!(store.get_viewport(ViewportId(1)), r2);
    }

    #[test]
    fn repaired_viewport_is_stored_as_built() {
        let store = ViewportStore::new();
        let repaired = Viewport::clamped(0.9, -0.2, 0.1, 1.4);
        assert_eq!(repaired, rect(0.1, 0.0, 0.9, 1.0));
        store.set_viewport(ViewportId(2), repaired, false);
        assert_eq!(store.get_viewport(ViewportId(2)), repaired);
    }

    #[test]
    fn every_observer_sees_user_and_non_user_updates_in_order() {
        let store = ViewportStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["detail", "widget"] {
            let log = Rc::clone(&log);
            store.add_observer(move |change: &ViewportChange| {
                log.borrow_mut().push((name, change.id, change.from_user));
            });
        }

        store.set_viewport(ViewportId(4), rect(0.1, 0.1, 0.9, 0.9), true);
        store.set_viewport(ViewportId(4), rect(0.2, 0.2, 0.8, 0.8), false);

        assert_eq!(
            *log.borrow(),
            vec![
                ("detail", ViewportId(4), true),
                ("widget", ViewportId(4), true),
                ("detail", ViewportId(4), false),
                ("widget", ViewportId(4), false),
            ]
        );
    }

    #[test]
    fn observer_may_read_store_during_broadcast() {
        let store = ViewportStore::new();
        let seen = Rc::new(Cell::new(Viewport::FULL));
        {
            let handle = store.clone();
            let seen = Rc::clone(&seen);
            store.add_observer(move |change: &ViewportChange| {
                seen.set(handle.get_viewport(change.id));
            });
        }
        let r = rect(0.3, 0.3, 0.6, 0.6);
        store.set_viewport(ViewportId(0), r, false);
        assert_eq!(seen.get(), r);
    }

    #[test]
    fn removed_observer_stops_receiving() {
        let store = ViewportStore::new();
        let calls = Rc::new(Cell::new(0));
        let id = {
            let calls = Rc::clone(&calls);
            store.add_observer(move |_: &ViewportChange| calls.set(calls.get() + 1))
        };
        store.set_viewport(ViewportId(0), Viewport::FULL, false);
        assert!(store.remove_observer(id));
        assert!(!store.remove_observer(id));
        store.set_viewport(ViewportId(0), Viewport::FULL, false);
        assert_eq!(calls.get(), 1);
        assert_eq!(store.observer_count(), 0);
    }
}
