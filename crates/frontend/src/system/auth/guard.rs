use contracts::system::access::{GuardState, Requirement, Unauthorized};
use leptos::error::Errors;
use leptos::prelude::*;

use super::context::use_guard_state;

/// Page-level guard.
///
/// Denial is not handled here: the view becomes `Err(Unauthorized)` and
/// propagates to the nearest [`PageBoundary`].
#[component]
pub fn RequirePermission(
    #[prop(into)] required: Requirement,
    /// Shown while the session is being restored
    #[prop(optional, into)]
    loading: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let state = use_guard_state(required.clone());

    move || -> Result<AnyView, Unauthorized> {
        match state.get() {
            GuardState::Loading => Ok(loading.run()),
            GuardState::Allowed => Ok(children()),
            GuardState::Denied => {
                log::debug!("Page denied, requires {}", required);
                Err(Unauthorized {
                    required: required.clone(),
                })
            }
        }
    }
}

/// Component-level guard: denial renders `fallback` (nothing by default)
#[component]
pub fn PermissionGate(
    #[prop(into)] required: Requirement,
    #[prop(optional, into)] loading: ViewFn,
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let state = use_guard_state(required);

    move || match state.get() {
        GuardState::Loading => loading.run(),
        GuardState::Allowed => children(),
        GuardState::Denied => fallback.run(),
    }
}

/// Route-level boundary that turns an escaped `Unauthorized` into the
/// "not permitted" view
#[component]
pub fn PageBoundary(children: Children) -> impl IntoView {
    view! {
        <ErrorBoundary fallback={|errors: ArcRwSignal<Errors>| {
            view! {
                <div class="page-not-permitted">
                    <h2>"Access denied"</h2>
                    <p>"You do not have permission to open this page."</p>
                    <ul class="page-not-permitted__details">
                        {move || {
                            errors
                                .get()
                                .into_iter()
                                .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                .collect::<Vec<_>>()
                        }}
                    </ul>
                </div>
            }
        }}>
            {children()}
        </ErrorBoundary>
    }
}
