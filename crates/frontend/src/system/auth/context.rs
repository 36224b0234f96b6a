use contracts::system::access::{GuardState, Requirement};
use contracts::system::auth::{LoginResponse, UserInfo};
use contracts::system::permissions::PermissionSet;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// True until the stored session has been checked
    pub loading: bool,
}

impl AuthState {
    fn restoring() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    fn anonymous() -> Self {
        Self::default()
    }

    fn signed_in(access_token: String, user_info: UserInfo) -> Self {
        Self {
            access_token: Some(access_token),
            user_info: Some(user_info),
            loading: false,
        }
    }

    /// `None` while loading; an anonymous session has no permissions
    pub fn permissions(&self) -> Option<PermissionSet> {
        if self.loading {
            return None;
        }
        Some(
            self.user_info
                .as_ref()
                .map(UserInfo::permissions)
                .unwrap_or_default(),
        )
    }
}

async fn refresh_session() -> AuthState {
    let Some(refresh_token) = storage::get_refresh_token() else {
        storage::clear_tokens();
        return AuthState::anonymous();
    };

    match api::refresh_token(refresh_token).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            match api::get_current_user(&response.access_token).await {
                Ok(user_info) => AuthState::signed_in(response.access_token, user_info),
                Err(e) => {
                    log::warn!("Refreshed token rejected: {}", e);
                    AuthState::anonymous()
                }
            }
        }
        Err(e) => {
            log::warn!("Session refresh failed: {}", e);
            storage::clear_tokens();
            AuthState::anonymous()
        }
    }
}

async fn restore_session() -> AuthState {
    let Some(access_token) = storage::get_access_token() else {
        return AuthState::anonymous();
    };

    match api::get_current_user(&access_token).await {
        Ok(user_info) => {
            log::info!("Session restored for '{}'", user_info.username);
            AuthState::signed_in(access_token, user_info)
        }
        Err(e) => {
            log::warn!("Stored access token rejected: {}", e);
            refresh_session().await
        }
    }
}

/// Session provider: restores the stored session once per mount and
/// exposes it to the tree
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::restoring());

    spawn_local(async move {
        let restored = restore_session().await;
        if set_auth_state.try_set(restored).is_some() {
            log::debug!("Session restored after AuthProvider was disposed, ignoring");
        }
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Resolved permissions of the current user, `None` while loading
pub fn use_permissions() -> Memo<Option<PermissionSet>> {
    let (auth_state, _) = use_auth();
    Memo::new(move |_| auth_state.with(|s| s.permissions()))
}

pub fn use_guard_state(required: Requirement) -> Signal<GuardState> {
    let permissions = use_permissions();
    Signal::derive(move || permissions.with(|p| GuardState::evaluate(&required, p.as_ref())))
}

/// Stores the tokens of a successful login and switches the session
pub fn sign_in(set_auth_state: WriteSignal<AuthState>, response: LoginResponse) {
    storage::save_access_token(&response.access_token);
    storage::save_refresh_token(&response.refresh_token);
    log::info!("Signed in as '{}'", response.user.username);
    set_auth_state.set(AuthState::signed_in(response.access_token, response.user));
}

pub async fn sign_out(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("{}", e);
        }
    }
    storage::clear_tokens();
    let _ = set_auth_state.try_set(AuthState::anonymous());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(permissions: &[&str]) -> UserInfo {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "username": "tech",
            "full_name": null,
            "email": null,
            "roles": {
                "id": "r1", "name": "technician", "level": 1,
                "permissions": permissions,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_permissions_none_while_restoring() {
        assert_eq!(AuthState::restoring().permissions(), None);
    }

    #[test]
    fn test_anonymous_has_empty_permissions() {
        assert_eq!(
            AuthState::anonymous().permissions(),
            Some(PermissionSet::new())
        );
    }

    #[test]
    fn test_signed_in_resolves_roles() {
        let state = AuthState::signed_in("t".to_string(), user(&["alarm:list", "dashboard:create"]));
        let set = state.permissions().unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&"alarm:list".parse().unwrap()));
    }
}
