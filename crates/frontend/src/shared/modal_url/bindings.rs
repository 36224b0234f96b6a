use leptos::prelude::*;
use std::any::Any;
use std::sync::Arc;

use super::catalog::ModalScope;
use super::codec::ModalChild;
use super::controller::ModalController;
use super::location::{BrowserLocation, QueryLocation};
use super::registry::ModalRegistry;

/// Reactive view of a [`ModalController`] for one component subtree.
///
/// Copy, so it can be moved into any number of event handlers.
pub struct ModalHandle<C: ModalChild> {
    controller: StoredValue<ModalController<C>>,
    active: RwSignal<Option<C>>,
}

impl<C: ModalChild> Clone for ModalHandle<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ModalChild> Copy for ModalHandle<C> {}

impl<C: ModalChild> ModalHandle<C> {
    pub fn open_modal<T: Any + Send + Sync>(&self, child: C, payload: T) {
        self.controller
            .with_value(move |controller| controller.open_modal(child, payload));
    }

    pub fn close_modal(&self) {
        self.controller.with_value(|controller| controller.close_modal());
    }

    /// Tracked: re-runs the caller when the active child changes
    pub fn active_child(&self) -> Option<C> {
        self.active.get()
    }

    pub fn is_open(&self, child: C) -> bool {
        self.active.get() == Some(child)
    }

    /// Tracked the same way as [`Self::active_child`]
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.active.track();
        self.controller
            .with_value(|controller| controller.payload::<T>())
    }

    /// Re-reads the URL after back/forward navigation
    pub fn sync_from_location(&self) {
        self.controller
            .try_with_value(|controller| controller.sync_from_location());
    }

    pub fn on_close(&self) -> Callback<()> {
        let handle = *self;
        Callback::new(move |_| handle.close_modal())
    }
}

pub fn expect_modal_registry() -> ModalRegistry {
    use_context::<ModalRegistry>()
        .expect("ModalRegistry not provided in context (provide it in app root)")
}

/// Creates the browser-backed controller for `scope` and provides it to
/// the subtree. Back/forward navigation re-syncs the active child.
pub fn provide_modal_controller<C: ModalChild>(scope: ModalScope<C>) -> ModalHandle<C> {
    let handle = provide_modal_controller_with(scope, Arc::new(BrowserLocation));

    let popstate = window_event_listener_untyped("popstate", move |_| handle.sync_from_location());
    on_cleanup(move || popstate.remove());

    handle
}

/// Same as [`provide_modal_controller`] over any [`QueryLocation`].
///
/// The controller is mirrored into a signal; on cleanup the subscription is
/// dropped and the namespace's payloads are released.
pub fn provide_modal_controller_with<C: ModalChild>(
    scope: ModalScope<C>,
    location: Arc<dyn QueryLocation>,
) -> ModalHandle<C> {
    let controller = ModalController::new(scope, location, expect_modal_registry());
    let active = RwSignal::new(controller.active_child());

    let subscription = controller.subscribe(move |child| {
        // No-op once the owning subtree has been disposed
        let _ = active.try_set(child);
    });

    let released = controller.clone();
    on_cleanup(move || {
        drop(subscription);
        released.release();
    });

    let handle = ModalHandle {
        controller: StoredValue::new(controller),
        active,
    };
    provide_context(handle);
    handle
}

pub fn expect_modal_controller<C: ModalChild>() -> ModalHandle<C> {
    use_context::<ModalHandle<C>>()
        .expect("ModalHandle not provided in context (call provide_modal_controller in the page)")
}

/// Payload to render for `child`: `None` unless `child` is the active one
/// and its payload is in memory
pub fn outlet_payload<C, T>(handle: ModalHandle<C>, child: C) -> Option<Arc<T>>
where
    C: ModalChild,
    T: Any + Send + Sync,
{
    if !handle.is_open(child) {
        return None;
    }
    handle.payload::<T>()
}

/// Renders `render(payload)` only while `child` is active and its payload is
/// in memory. A URL that names the child without a payload renders nothing.
pub fn modal_outlet<C, T, F, V>(handle: ModalHandle<C>, child: C, render: F) -> impl IntoView
where
    C: ModalChild,
    T: Any + Send + Sync,
    F: Fn(Arc<T>) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    move || match outlet_payload::<C, T>(handle, child) {
        Some(payload) => render(payload).into_any(),
        None => ().into_any(),
    }
}
