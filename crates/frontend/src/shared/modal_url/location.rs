use std::sync::{Arc, Mutex, PoisonError};
use wasm_bindgen::JsValue;
use web_sys::window;

/// Read/write access to the query part of the current URL
pub trait QueryLocation: Send + Sync {
    /// Current query string including the leading `?`, or empty
    fn search(&self) -> String;

    /// Replace the query string without reloading or pushing a history entry
    fn replace_search(&self, search: &str);
}

/// The browser address bar (`location.search` + `history.replaceState`)
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

impl QueryLocation for BrowserLocation {
    fn search(&self) -> String {
        window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn replace_search(&self, search: &str) {
        let Some(w) = window() else {
            return;
        };
        let location = w.location();
        let path = location.pathname().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        let new_url = format!("{}{}{}", path, search, hash);

        match w.history() {
            Ok(history) => {
                if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&new_url)) {
                    log::warn!("replaceState failed for '{}': {:?}", new_url, e);
                }
            }
            Err(e) => log::warn!("History API unavailable: {:?}", e),
        }
    }
}

/// In-memory URL, used off-browser and to simulate a reload with a
/// pre-populated query string
#[derive(Clone, Debug, Default)]
pub struct MemoryLocation {
    search: Arc<Mutex<String>>,
}

impl MemoryLocation {
    pub fn new(search: &str) -> Self {
        Self {
            search: Arc::new(Mutex::new(search.to_string())),
        }
    }
}

impl QueryLocation for MemoryLocation {
    fn search(&self) -> String {
        self.search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_search(&self, search: &str) {
        *self.search.lock().unwrap_or_else(PoisonError::into_inner) = search.to_string();
    }
}
