use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity reported by the condition-monitoring pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSeverity {
    Info,
    Warning,
    Critical,
}

impl AlarmSeverity {
    pub fn code(&self) -> &'static str {
        match self {
            AlarmSeverity::Info => "info",
            AlarmSeverity::Warning => "warning",
            AlarmSeverity::Critical => "critical",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AlarmSeverity::Info => "Info",
            AlarmSeverity::Warning => "Warning",
            AlarmSeverity::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub asset_id: String,
    pub asset_name: String,
    pub severity: AlarmSeverity,
    pub message: String,
    pub acknowledged: bool,
    pub note: Option<String>,
    pub raised_at: DateTime<Utc>,
}

impl Alarm {
    /// Case-insensitive match against the text columns of the alarm list
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.asset_name.to_lowercase().contains(&query)
            || self.message.to_lowercase().contains(&query)
            || self.id.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAlarmDto {
    pub id: String,
    pub acknowledged: bool,
    pub note: Option<String>,
}

impl From<&Alarm> for UpdateAlarmDto {
    fn from(a: &Alarm) -> Self {
        Self {
            id: a.id.clone(),
            acknowledged: a.acknowledged,
            note: a.note.clone(),
        }
    }
}
