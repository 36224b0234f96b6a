use crate::routes::routes::AppRoutes;
use crate::shared::modal_url::ModalRegistry;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    // Payload открытых модальных окон, общий для всех страниц-списков
    provide_context(ModalRegistry::new());

    view! {
        <ConfigProvider>
            <AuthProvider>
                <AppRoutes />
            </AuthProvider>
        </ConfigProvider>
    }
}
