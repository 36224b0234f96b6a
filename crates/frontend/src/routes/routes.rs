use crate::domain::a001_alarm::ui::list::AlarmListPage;
use crate::system::auth::context::{sign_out, use_auth};
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use thaw::*;

#[component]
fn TopBar() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();

    let user_name = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| u.full_name.clone().unwrap_or_else(|| u.username.clone()))
                .unwrap_or_default()
        })
    };

    view! {
        <header class="top-bar">
            <span class="top-bar__title">"Condition Monitoring"</span>
            <nav class="top-bar__nav">
                <A href="/alarms">"Alarms"</A>
            </nav>
            <span class="top-bar__user">{user_name}</span>
            <Button
                appearance=ButtonAppearance::Subtle
                size=ButtonSize::Small
                on_click=move |_| spawn_local(sign_out(set_auth_state))
            >
                "Sign out"
            </Button>
        </header>
    }
}

#[component]
fn MainLayout() -> impl IntoView {
    view! {
        <Router>
            <TopBar />
            <main class="page-content">
                <Routes fallback=|| view! { <p class="page-not-found">"Page not found"</p> }>
                    <Route path=path!("/") view=AlarmListPage />
                    <Route path=path!("/alarms") view=AlarmListPage />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || !auth_state.with(|s| s.loading)
            fallback=|| view! { <div class="app-loading"><Spinner /></div> }
        >
            <Show
                when=move || auth_state.with(|s| s.access_token.is_some())
                fallback=|| view! { <LoginPage /> }
            >
                <MainLayout />
            </Show>
        </Show>
    }
}
