//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_bar::NavBar;
use crate::components::protected_route::ProtectedRoute;
use crate::config::AppConfig;
use crate::net::firebase::FirebaseAuth;
use crate::pages::{
    doctor_results::DoctorResultsPage, home::HomePage, login::LoginPage, patient_results::PatientResultsPage,
    register::RegisterPage,
};
use crate::state::session_store::SessionStore;
use crate::util::profile_cache::LocalStorageCache;

/// Session store used by the running app.
pub type AppSession = SessionStore<FirebaseAuth, LocalStorageCache>;

/// Gate plus navigation chrome around an authenticated page.
#[component]
fn Authenticated(children: ChildrenFn) -> impl IntoView {
    view! {
        <ProtectedRoute>
            <NavBar />
            <main class="page">{children()}</main>
        </ProtectedRoute>
    }
}

/// Root application component.
///
/// Builds the session store, subscribes it to the auth backend for the
/// lifetime of the app, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_build_env();
    let backend = Arc::new(FirebaseAuth::new(config.clone()));
    let session: AppSession = SessionStore::new(backend, Arc::new(LocalStorageCache));
    let subscription = session.connect();
    on_cleanup(move || subscription.cancel());

    provide_context(session.state());
    provide_context(session);
    provide_context(config);

    view! {
        <Title text="Vitalytics" />

        <Router>
            <Routes fallback=|| "Página no encontrada.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage />
                <Route path=StaticSegment("register") view=RegisterPage />
                <Route
                    path=StaticSegment("")
                    view=|| view! { <Authenticated><HomePage /></Authenticated> }
                />
                <Route
                    path=StaticSegment("resultados")
                    view=|| view! { <Authenticated><PatientResultsPage /></Authenticated> }
                />
                <Route
                    path=(StaticSegment("doctor"), StaticSegment("resultados"))
                    view=|| view! { <Authenticated><DoctorResultsPage /></Authenticated> }
                />
            </Routes>
        </Router>
    }
}
