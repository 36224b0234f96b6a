use web_sys::{window, Storage};

const ACCESS_TOKEN_KEY: &str = "monitor_access_token";
const REFRESH_TOKEN_KEY: &str = "monitor_refresh_token";

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

fn save(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            log::warn!("Failed to persist '{}' in localStorage", key);
        }
    }
}

fn load(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

pub fn save_access_token(token: &str) {
    save(ACCESS_TOKEN_KEY, token);
}

pub fn get_access_token() -> Option<String> {
    load(ACCESS_TOKEN_KEY)
}

pub fn save_refresh_token(token: &str) {
    save(REFRESH_TOKEN_KEY, token);
}

pub fn get_refresh_token() -> Option<String> {
    load(REFRESH_TOKEN_KEY)
}

/// `Authorization` header value for the stored access token
pub fn auth_header() -> Option<String> {
    get_access_token().map(|token| format!("Bearer {}", token))
}

pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}
