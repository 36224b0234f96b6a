use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::catalog::ModalNamespace;

type Slot = (ModalNamespace, &'static str);
type Payload = Arc<dyn Any + Send + Sync>;

/// Transient payloads of open dialogs, keyed by (namespace, child).
///
/// Lives only in memory: nothing here survives a reload. Provided once at
/// the application root and shared by every controller.
#[derive(Clone, Default)]
pub struct ModalRegistry {
    payloads: Arc<Mutex<HashMap<Slot, Payload>>>,
}

impl ModalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Slot, Payload>> {
        self.payloads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store<T: Any + Send + Sync>(
        &self,
        namespace: ModalNamespace,
        child: &'static str,
        payload: T,
    ) {
        self.lock().insert((namespace, child), Arc::new(payload));
    }

    /// `None` when nothing is stored or the stored value has another type
    pub fn get<T: Any + Send + Sync>(
        &self,
        namespace: ModalNamespace,
        child: &'static str,
    ) -> Option<Arc<T>> {
        let payload = self.lock().get(&(namespace, child)).cloned()?;
        payload.downcast::<T>().ok()
    }

    pub fn clear_namespace(&self, namespace: ModalNamespace) {
        self.lock().retain(|(ns, _), _| *ns != namespace);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
