use contracts::domain::a001_alarm::aggregate::{Alarm, UpdateAlarmDto};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::system::auth::storage;

pub async fn fetch_alarms() -> Result<Vec<Alarm>, String> {
    let auth_header = storage::auth_header().ok_or("Not authenticated")?;

    let response = Request::get(&api_url("/api/alarms"))
        .header("Authorization", &auth_header)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to fetch alarms: {}", response.status()));
    }

    response
        .json::<Vec<Alarm>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Acknowledge an alarm and/or change its note
pub async fn update_alarm(dto: UpdateAlarmDto) -> Result<(), String> {
    let auth_header = storage::auth_header().ok_or("Not authenticated")?;

    let response = Request::put(&api_url(&format!("/api/alarms/{}", dto.id)))
        .header("Authorization", &auth_header)
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to update alarm: {}", response.status()));
    }
    Ok(())
}

pub async fn delete_alarm(id: &str) -> Result<(), String> {
    let auth_header = storage::auth_header().ok_or("Not authenticated")?;

    let response = Request::delete(&api_url(&format!("/api/alarms/{}", id)))
        .header("Authorization", &auth_header)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to delete alarm: {}", response.status()));
    }
    Ok(())
}
