//! Root route: forwards each signed-in user to their dashboard.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::session::{Role, SessionState};
use crate::util::auth::dashboard_route;

#[component]
pub fn HomePage() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();
    let target = dashboard_route(state.with_untracked(|s| s.role().unwrap_or(Role::Patient)));
    view! { <Redirect path=target /> }
}
