//! Horizontal percentage bar used for severity and score readouts.

use leptos::prelude::*;

use crate::state::clinical::severity_percent;

#[component]
pub fn SeverityBar(value: u8) -> impl IntoView {
    let now = value.to_string();
    let width = format!("width: {}%", severity_percent(value));
    view! {
        <div class="severity-bar" role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow=now>
            <div class="severity-bar__fill" style=width></div>
        </div>
    }
}
