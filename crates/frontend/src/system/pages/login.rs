use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::system::auth::{api, context::sign_in, context::use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();

    let submit = move || {
        let username_val = username.get_untracked();
        let password_val = password.get_untracked();
        if username_val.trim().is_empty() || password_val.is_empty() {
            set_error_message.set(Some("Enter username and password".to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::login(username_val, password_val).await {
                Ok(response) => sign_in(set_auth_state, response),
                Err(e) => {
                    let _ = set_error_message.try_set(Some(e));
                    let _ = set_is_loading.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Condition Monitoring"</h1>
                <h2>"Administration"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <div class="form-group">
                    <label>"Username"</label>
                    <Input value=username placeholder="username" />
                </div>

                <div class="form-group">
                    <label>"Password"</label>
                    <Input value=password input_type=InputType::Password />
                </div>

                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || is_loading.get())
                    on_click=move |_| submit()
                >
                    {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                </Button>
            </div>
        </div>
    }
}
