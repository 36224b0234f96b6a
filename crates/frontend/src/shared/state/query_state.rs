use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub type QueryRecord = Map<String, Value>;

/// Filter/pagination state of a list page.
///
/// `patch` merges one level deep: keys in the partial overwrite, every other
/// key keeps its value. Keys are never removed.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryState {
    defaults: QueryRecord,
    current: QueryRecord,
}

impl QueryState {
    pub fn new(defaults: QueryRecord) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
        }
    }

    /// Defaults from a typed record; it must serialize to a JSON object
    pub fn from_defaults<T: Serialize>(defaults: &T) -> Result<Self, String> {
        match serde_json::to_value(defaults) {
            Ok(Value::Object(record)) => Ok(Self::new(record)),
            Ok(other) => Err(format!("Query defaults must be an object, got {}", other)),
            Err(e) => Err(format!("Failed to serialize query defaults: {}", e)),
        }
    }

    pub fn defaults(&self) -> &QueryRecord {
        &self.defaults
    }

    pub fn snapshot(&self) -> &QueryRecord {
        &self.current
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.current.get(key)
    }

    pub fn patch(&mut self, partial: impl Into<Value>) {
        match partial.into() {
            Value::Object(partial) => {
                for (key, value) in partial {
                    self.current.insert(key, value);
                }
            }
            other => log::warn!("Ignoring non-object query patch: {}", other),
        }
    }

    /// Current state as the typed record it was seeded from
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(Value::Object(self.current.clone()))
            .map_err(|e| format!("Failed to decode query state: {}", e))
    }
}

#[derive(Clone, Copy)]
pub struct QueryStateHandle {
    state: RwSignal<QueryState>,
}

impl QueryStateHandle {
    pub fn snapshot(&self) -> QueryRecord {
        self.state.with(|s| s.snapshot().clone())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.state.with(|s| {
            s.get(key)
                .and_then(|v| serde_json::from_value(v.clone()).ok())
        })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.state.with(|s| match s.decode() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
    }

    /// Для обработчиков событий: чтение без подписки
    pub fn decode_untracked<T: DeserializeOwned>(&self) -> Option<T> {
        self.state.with_untracked(|s| s.decode().ok())
    }

    pub fn patch(&self, partial: impl Into<Value>) {
        let partial = partial.into();
        // После размонтирования сигнал удалён, поздний patch игнорируется
        let _ = self.state.try_update(|s| s.patch(partial));
    }
}

/// Состояние фильтров, инициализированное из `defaults`; принадлежит вызывающему компоненту
pub fn use_query_state<T: Serialize>(defaults: &T) -> QueryStateHandle {
    let state = QueryState::from_defaults(defaults).unwrap_or_else(|e| {
        log::warn!("{}", e);
        QueryState::new(QueryRecord::new())
    });
    QueryStateHandle {
        state: RwSignal::new(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Filters {
        search: String,
        page: usize,
        page_size: usize,
        range: Option<(String, String)>,
    }

    fn defaults() -> Filters {
        Filters {
            search: String::new(),
            page: 0,
            page_size: 50,
            range: None,
        }
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut state = QueryState::from_defaults(&defaults()).unwrap();
        let before = state.clone();
        state.patch(json!({}));
        assert_eq!(state, before);
    }

    #[test]
    fn test_patch_changes_only_given_keys() {
        let mut state = QueryState::from_defaults(&defaults()).unwrap();
        state.patch(json!({ "page": 3 }));
        assert_eq!(state.get("page"), Some(&json!(3)));
        assert_eq!(state.get("page_size"), Some(&json!(50)));
        assert_eq!(state.get("search"), Some(&json!("")));

        state.patch(json!({ "search": "pump" }));
        let decoded: Filters = state.decode().unwrap();
        assert_eq!(decoded.page, 3);
        assert_eq!(decoded.search, "pump");
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut state = QueryState::from_defaults(&defaults()).unwrap();
        state.patch(json!({ "range": ["2024-01-01", "2024-01-31"] }));
        state.patch(json!({ "range": ["2024-02-01", "2024-02-29"] }));
        assert_eq!(state.get("range"), Some(&json!(["2024-02-01", "2024-02-29"])));
    }

    #[test]
    fn test_reset_by_patching_default() {
        let mut state = QueryState::from_defaults(&defaults()).unwrap();
        state.patch(json!({ "page": 7 }));
        let default_page = state.defaults()["page"].clone();
        state.patch(json!({ "page": default_page }));
        assert_eq!(state.decode::<Filters>().unwrap(), defaults());
    }

    #[test]
    fn test_non_object_patch_ignored() {
        let mut state = QueryState::from_defaults(&defaults()).unwrap();
        let before = state.clone();
        state.patch(json!(42));
        assert_eq!(state, before);
        assert!(QueryState::from_defaults(&5).is_err());
    }
}
