//! Top navigation bar with identity chip and logout.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppSession;
use crate::util::auth::LOGIN_ROUTE;

/// Header shown on authenticated pages.
///
/// A failed logout leaves the session intact and shows the reason inline.
#[component]
pub fn NavBar() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let state = session.state();
    let navigate = use_navigate();
    let logout_error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let display_name = move || state.with(|s| s.identity.as_ref().map(|i| i.display_name()).unwrap_or_default());
    let role_label = move || state.with(|s| s.role().map(|r| r.label()).unwrap_or_default());

    let on_logout = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let session = session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match session.logout().await {
                Ok(()) => {
                    logout_error.set(None);
                    navigate(LOGIN_ROUTE, NavigateOptions::default());
                }
                Err(err) => logout_error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    view! {
        <header class="nav-bar">
            <a href="/" class="nav-bar__brand">"Vitalytics"</a>
            <span class="nav-bar__spacer"></span>
            <span class="nav-bar__user">{display_name}</span>
            <span class="nav-bar__role">{role_label}</span>
            <button class="btn nav-bar__logout" on:click=on_logout disabled=move || busy.get()>
                "Cerrar sesión"
            </button>
            <Show when=move || logout_error.get().is_some()>
                <p class="nav-bar__error">{move || logout_error.get().unwrap_or_default()}</p>
            </Show>
        </header>
    }
}
