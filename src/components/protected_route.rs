//! Access gate wrapping routes that need a signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads `RwSignal<SessionState>` from context and renders exactly one of:
//! spinner (plus a slow-load notice once the configured delay elapses from
//! mount), the session error, a redirect to `/login`, or the children.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::config::AppConfig;
use crate::state::session::SessionState;
use crate::util::auth::{GateDecision, LOGIN_ROUTE, LoadingNotice, SLOW_LOAD_NOTICE, decide};

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let config = expect_context::<AppConfig>();

    let notice = RwSignal::new(LoadingNotice::on_mount(
        session.with_untracked(|s| s.is_loading),
        config.loading_notice_delay,
    ));

    #[cfg(feature = "csr")]
    {
        let timer = StoredValue::new_local(None::<gloo_timers::callback::Timeout>);
        if notice.with_untracked(LoadingNotice::is_armed) {
            let delay = notice.with_untracked(LoadingNotice::delay);
            let delay_ms = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            let timeout = gloo_timers::callback::Timeout::new(delay_ms, move || {
                notice.update(|n| {
                    n.on_elapsed(delay);
                });
            });
            timer.set_value(Some(timeout));
        }

        Effect::new(move || {
            let loading = session.with(|s| s.is_loading);
            notice.update(|n| n.on_loading_changed(loading));
            if !notice.with_untracked(LoadingNotice::is_armed) {
                // Dropping the timeout cancels it.
                timer.set_value(None);
            }
        });

        on_cleanup(move || {
            notice.try_update(LoadingNotice::on_unmount);
            timer.try_update_value(|t| *t = None);
        });
    }

    let decision = Memo::new(move |_| decide(&session.get(), notice.with(LoadingNotice::is_visible)));

    move || match decision.get() {
        GateDecision::Loading { show_notice } => view! {
            <div class="gate gate--loading">
                <div class="gate__spinner" aria-label="Cargando"></div>
                {show_notice.then(|| view! { <p class="gate__notice">{SLOW_LOAD_NOTICE}</p> })}
            </div>
        }
        .into_any(),
        GateDecision::Error(message) => view! {
            <div class="gate gate--error">
                <div class="gate__error">{message}</div>
            </div>
        }
        .into_any(),
        GateDecision::RedirectToLogin => view! { <Redirect path=LOGIN_ROUTE/> }.into_any(),
        GateDecision::Content => children().into_any(),
    }
}
