use contracts::domain::a001_alarm::aggregate::AlarmSeverity;
use serde::{Deserialize, Serialize};

/// Filter and pagination defaults of the alarm list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlarmListQuery {
    pub search: String,
    pub severity: Option<AlarmSeverity>,
    pub unacknowledged_only: bool,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
}

impl Default for AlarmListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            severity: None,
            unacknowledged_only: false,
            sort_field: "raised_at".to_string(),
            sort_ascending: false,
            page: 0,
            page_size: 50,
        }
    }
}
