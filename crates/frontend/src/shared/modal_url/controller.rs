use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::catalog::ModalScope;
use super::codec::{self, ModalChild};
use super::location::QueryLocation;
use super::registry::ModalRegistry;

type Listener<C> = Arc<dyn Fn(Option<C>) + Send + Sync>;

struct Observers<C> {
    last_published: Option<C>,
    next_id: u64,
    listeners: Vec<(u64, Listener<C>)>,
}

/// Unsubscribes when dropped
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Dialog state of one namespace.
///
/// The active child lives in the URL; the payload lives in the shared
/// [`ModalRegistry`]. At most one child is active at a time and every write
/// replaces the previous one, so the last call wins.
pub struct ModalController<C: ModalChild> {
    scope: ModalScope<C>,
    location: Arc<dyn QueryLocation>,
    registry: ModalRegistry,
    observers: Arc<Mutex<Observers<C>>>,
}

impl<C: ModalChild> Clone for ModalController<C> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope,
            location: self.location.clone(),
            registry: self.registry.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<C: ModalChild> ModalController<C> {
    pub fn new(
        scope: ModalScope<C>,
        location: Arc<dyn QueryLocation>,
        registry: ModalRegistry,
    ) -> Self {
        let last_published = codec::decode(&location.search(), scope.param());
        Self {
            scope,
            location,
            registry,
            observers: Arc::new(Mutex::new(Observers {
                last_published,
                next_id: 1,
                listeners: Vec::new(),
            })),
        }
    }

    fn observers(&self) -> MutexGuard<'_, Observers<C>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn scope(&self) -> ModalScope<C> {
        self.scope
    }

    /// Child currently named by the URL
    pub fn active_child(&self) -> Option<C> {
        codec::decode(&self.location.search(), self.scope.param())
    }

    pub fn is_open(&self, child: C) -> bool {
        self.active_child() == Some(child)
    }

    /// Activates `child`, replacing whatever was open in this namespace
    pub fn open_modal<T: Any + Send + Sync>(&self, child: C, payload: T) {
        let namespace = self.scope.namespace();
        self.registry.clear_namespace(namespace);
        self.registry.store(namespace, child.param_value(), payload);
        self.write(Some(child));
    }

    /// Activates a dialog that needs no payload
    pub fn open_without_payload(&self, child: C) {
        self.registry.clear_namespace(self.scope.namespace());
        self.write(Some(child));
    }

    pub fn close_modal(&self) {
        self.registry.clear_namespace(self.scope.namespace());
        self.write(None);
    }

    /// Payload of the active child.
    ///
    /// `None` when nothing is open, and also when the URL names a child whose
    /// payload was never stored in this page session (reload, shared link).
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let child = self.active_child()?;
        let payload = self
            .registry
            .get::<T>(self.scope.namespace(), child.param_value());
        if payload.is_none() {
            log::debug!(
                "'{}={}' has no payload in memory",
                self.scope.param(),
                child.param_value()
            );
        }
        payload
    }

    /// Registers `listener` for every change of the active child
    pub fn subscribe(&self, listener: impl Fn(Option<C>) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut observers = self.observers();
            let id = observers.next_id;
            observers.next_id += 1;
            observers.listeners.push((id, Arc::new(listener)));
            id
        };
        let observers = Arc::downgrade(&self.observers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(observers) = observers.upgrade() {
                    observers
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .listeners
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    /// Re-reads the URL after navigation (back/forward) and notifies on change
    pub fn sync_from_location(&self) {
        let current = self.active_child();
        let changed = self.observers().last_published != current;
        if changed {
            self.publish(current);
        }
    }

    /// Drops this namespace's payloads; the URL is left to navigation
    pub fn release(&self) {
        self.registry.clear_namespace(self.scope.namespace());
    }

    fn write(&self, child: Option<C>) {
        let next = codec::encode(&self.location.search(), self.scope.param(), child);
        self.location.replace_search(&next);
        match child {
            Some(child) => log::debug!("Modal {}={}", self.scope.param(), child.param_value()),
            None => log::debug!("Modal {} closed", self.scope.param()),
        }
        self.publish(child);
    }

    fn publish(&self, child: Option<C>) {
        let listeners: Vec<Listener<C>> = {
            let mut observers = self.observers();
            observers.last_published = child;
            observers.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::modal_url::catalog::{CrudModal, ALARM_MODAL, ASSET_MODAL};
    use crate::shared::modal_url::location::{MemoryLocation, QueryLocation};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
    }

    fn row(id: &str) -> Row {
        Row { id: id.to_string() }
    }

    fn controller(
        location: &MemoryLocation,
        registry: &ModalRegistry,
    ) -> ModalController<CrudModal> {
        ModalController::new(ALARM_MODAL, Arc::new(location.clone()), registry.clone())
    }

    #[test]
    fn test_open_then_close_scenario() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);

        modal.open_modal(CrudModal::Edit, row("a1"));
        assert_eq!(location.search(), "?alarm_modal=edit");
        assert!(modal.is_open(CrudModal::Edit));
        assert_eq!(modal.payload::<Row>().as_deref(), Some(&row("a1")));

        modal.close_modal();
        assert_eq!(location.search(), "");
        assert_eq!(modal.active_child(), None);
        assert!(modal.payload::<Row>().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_payload_is_the_same_value() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);
        let shared = Arc::new(row("a2"));

        modal.open_modal(CrudModal::View, shared.clone());
        let stored = modal.payload::<Arc<Row>>().unwrap();
        assert!(Arc::ptr_eq(&*stored, &shared));
    }

    #[test]
    fn test_last_open_wins_and_never_stacks() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);

        modal.open_modal(CrudModal::View, row("a1"));
        modal.open_modal(CrudModal::Delete, row("a2"));
        assert!(!modal.is_open(CrudModal::View));
        assert!(modal.is_open(CrudModal::Delete));
        assert_eq!(modal.payload::<Row>().unwrap().id, "a2");
        assert_eq!(registry.len(), 1);

        modal.close_modal();
        for child in [CrudModal::View, CrudModal::Edit, CrudModal::Delete] {
            assert!(!modal.is_open(child));
        }
    }

    #[test]
    fn test_reload_keeps_child_but_loses_payload() {
        let location = MemoryLocation::new("?alarm_modal=edit&page=3");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);

        assert!(modal.is_open(CrudModal::Edit));
        assert!(modal.payload::<Row>().is_none());
    }

    #[test]
    fn test_unknown_child_is_closed() {
        let location = MemoryLocation::new("?alarm_modal=unknown");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);

        assert_eq!(modal.active_child(), None);
        assert!(modal.payload::<Row>().is_none());
    }

    #[test]
    fn test_namespaces_are_independent() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let alarms = controller(&location, &registry);
        let assets = ModalController::new(ASSET_MODAL, Arc::new(location.clone()), registry.clone());

        alarms.open_modal(CrudModal::Edit, row("a1"));
        assets.open_modal(CrudModal::View, row("pump-7"));
        assert!(alarms.is_open(CrudModal::Edit));
        assert_eq!(alarms.payload::<Row>().unwrap().id, "a1");

        assets.close_modal();
        assert!(alarms.is_open(CrudModal::Edit));
        assert_eq!(alarms.payload::<Row>().unwrap().id, "a1");
        assert_eq!(location.search(), "?alarm_modal=edit");
    }

    #[test]
    fn test_open_without_payload_drops_previous_payload() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);

        modal.open_modal(CrudModal::Edit, row("a1"));
        modal.open_without_payload(CrudModal::View);
        assert!(modal.is_open(CrudModal::View));
        assert!(modal.payload::<Row>().is_none());
    }

    #[test]
    fn test_subscribers_see_every_change_until_dropped() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);
        let seen: Arc<Mutex<Vec<Option<CrudModal>>>> = Arc::default();

        let subscription = {
            let seen = seen.clone();
            modal.subscribe(move |child| seen.lock().unwrap().push(child))
        };
        modal.open_modal(CrudModal::View, row("a1"));
        modal.open_modal(CrudModal::Edit, row("a1"));
        modal.close_modal();
        drop(subscription);
        modal.open_modal(CrudModal::Delete, row("a1"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some(CrudModal::View), Some(CrudModal::Edit), None]
        );
    }

    #[test]
    fn test_sync_from_location_publishes_only_changes() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);
        let seen: Arc<Mutex<Vec<Option<CrudModal>>>> = Arc::default();
        let _subscription = {
            let seen = seen.clone();
            modal.subscribe(move |child| seen.lock().unwrap().push(child))
        };

        modal.sync_from_location();
        location.replace_search("?alarm_modal=delete");
        modal.sync_from_location();
        modal.sync_from_location();

        assert_eq!(*seen.lock().unwrap(), vec![Some(CrudModal::Delete)]);
    }

    #[test]
    fn test_release_clears_payload_only() {
        let location = MemoryLocation::new("");
        let registry = ModalRegistry::new();
        let modal = controller(&location, &registry);

        modal.open_modal(CrudModal::Edit, row("a1"));
        modal.release();
        assert!(modal.is_open(CrudModal::Edit));
        assert!(modal.payload::<Row>().is_none());
    }
}
