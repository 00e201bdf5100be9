//! Doctor dashboard: searchable patient list with severity readouts.

#[cfg(test)]
#[path = "doctor_results_test.rs"]
mod doctor_results_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::components::severity_bar::SeverityBar;
use crate::net::clinical::patient_summaries;
use crate::state::clinical::{PatientSummary, filter_patients};
use crate::state::session::{Role, SessionState};
use crate::util::auth::should_redirect_role;

fn severity_caption(severity: u8) -> String {
    format!("Severidad: {severity}%")
}

#[component]
pub fn DoctorResultsPage() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();
    if state.with_untracked(|s| should_redirect_role(s, Role::Doctor)) {
        return view! { <Redirect path="/" /> }.into_any();
    }

    let patients = StoredValue::new(patient_summaries());
    let search = RwSignal::new(String::new());
    let selected = RwSignal::new(None::<PatientSummary>);

    let visible = move || {
        let term = search.get();
        patients.with_value(|all| filter_patients(all, &term).into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="results-page">
            <h1>"Resultados de Pacientes"</h1>
            <input
                class="search-input"
                type="search"
                placeholder="Buscar por nombre, ID o condición..."
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            <ul class="patient-list">
                <For each=visible key=|p| p.id.clone() let:patient>
                    {
                        let caption = severity_caption(patient.severity);
                        let severity = patient.severity;
                        let chosen = patient.clone();
                        view! {
                            <li class="patient-card">
                                <div class="patient-card__header">
                                    <span class="patient-card__name">{patient.name}</span>
                                    <span class="patient-card__id">{patient.id}</span>
                                </div>
                                <p class="patient-card__condition">{patient.condition}</p>
                                <p class="patient-card__updated">{format!("Última actualización: {}", patient.last_update)}</p>
                                <span class="patient-card__severity">{caption}</span>
                                <SeverityBar value=severity />
                                <button class="btn" on:click=move |_| selected.set(Some(chosen.clone()))>
                                    "Ver Detalles"
                                </button>
                            </li>
                        }
                    }
                </For>
            </ul>
            {move || {
                selected
                    .get()
                    .map(|p| {
                        view! {
                            <section class="patient-detail">
                                <h2>{p.name}</h2>
                                <p>{format!("ID: {}", p.id)}</p>
                                <p>{p.condition}</p>
                                <SeverityBar value=p.severity />
                            </section>
                        }
                    })
            }}
        </div>
    }
    .into_any()
}
