//! Patient dashboard: measurement sessions and submitted questionnaires.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered behind the access gate. Records and questionnaires are narrowed
//! to the signed-in user before anything is counted or listed.

#[cfg(test)]
#[path = "patient_results_test.rs"]
mod patient_results_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::net::clinical::{load_questionnaires, patient_records};
use crate::state::clinical::{
    PatientRecord, Questionnaire, image_count_label, questionnaires_for_user, records_for_user, summarize,
};
use crate::state::session::{Role, SessionState};
use crate::util::auth::should_redirect_role;

const NO_AREAS: &str = "Ninguna zona seleccionada";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResultsTab {
    Clinical,
    Questionnaires,
}

impl ResultsTab {
    fn label(self) -> &'static str {
        match self {
            Self::Clinical => "Datos Clínicos",
            Self::Questionnaires => "Cuestionarios",
        }
    }
}

fn areas_text(areas: &[String]) -> String {
    if areas.is_empty() { NO_AREAS.to_owned() } else { areas.join(", ") }
}

#[component]
pub fn PatientResultsPage() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();
    if state.with_untracked(|s| should_redirect_role(s, Role::Patient)) {
        return view! { <Redirect path="/" /> }.into_any();
    }

    let user_id = state.with_untracked(|s| s.identity.as_ref().map(|i| i.id.clone()).unwrap_or_default());
    let all_records = patient_records();
    let all_questionnaires = load_questionnaires();
    let records: Vec<PatientRecord> = records_for_user(&all_records, &user_id).into_iter().cloned().collect();
    let questionnaires: Vec<Questionnaire> =
        questionnaires_for_user(&all_questionnaires, &user_id).into_iter().cloned().collect();
    let summary = summarize(&questionnaires.iter().collect::<Vec<_>>(), &records.iter().collect::<Vec<_>>());

    let tab = RwSignal::new(ResultsTab::Clinical);
    let selected = RwSignal::new(None::<PatientRecord>);
    let records = StoredValue::new(records);
    let questionnaires = StoredValue::new(questionnaires);

    let tab_button = move |which: ResultsTab| {
        view! {
            <button
                class="tab"
                class=("tab--active", move || tab.get() == which)
                on:click=move |_| tab.set(which)
            >
                {which.label()}
            </button>
        }
    };

    view! {
        <div class="results-page">
            <h1>"Mis Resultados"</h1>
            <div class="summary-cards">
                <div class="summary-card">
                    <span class="summary-card__label">"Cuestionarios completados"</span>
                    <span class="summary-card__value">{summary.questionnaires_completed}</span>
                </div>
                <div class="summary-card">
                    <span class="summary-card__label">"Nivel de picor promedio"</span>
                    <span class="summary-card__value">{summary.average_itch_label()}</span>
                </div>
                <div class="summary-card">
                    <span class="summary-card__label">"Mediciones registradas"</span>
                    <span class="summary-card__value">{summary.measurements}</span>
                </div>
            </div>
            <div class="tabs">
                {tab_button(ResultsTab::Clinical)}
                {tab_button(ResultsTab::Questionnaires)}
            </div>
            {move || match tab.get() {
                ResultsTab::Clinical => match selected.get() {
                    Some(record) => view! {
                        <RecordDetail record=record on_back=Callback::new(move |()| selected.set(None)) />
                    }
                    .into_any(),
                    None => view! {
                        <RecordList records=records.get_value() on_select=Callback::new(move |r| selected.set(Some(r))) />
                    }
                    .into_any(),
                },
                ResultsTab::Questionnaires => view! {
                    <QuestionnaireList questionnaires=questionnaires.get_value() />
                }
                .into_any(),
            }}
        </div>
    }
    .into_any()
}

#[component]
fn RecordList(records: Vec<PatientRecord>, on_select: Callback<PatientRecord>) -> impl IntoView {
    if records.is_empty() {
        return view! { <p class="empty-state">"No hay mediciones disponibles."</p> }.into_any();
    }
    view! {
        <ul class="record-list">
            {records
                .into_iter()
                .map(|record| {
                    let date = record.date.clone();
                    let intensity = format!("Intensidad: {}/10", record.behavioral.itch_intensity);
                    view! {
                        <li class="record-list__item">
                            <span class="record-list__date">{date}</span>
                            <span class="record-list__meta">{intensity}</span>
                            <button class="btn" on:click=move |_| on_select.run(record.clone())>
                                "Ver detalle"
                            </button>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

#[component]
fn RecordDetail(record: PatientRecord, on_back: Callback<()>) -> impl IntoView {
    let b = record.behavioral;
    let s = record.sleep;
    let p = record.physiological;
    let c = record.clinical;
    view! {
        <section class="record-detail">
            <button class="btn" on:click=move |_| on_back.run(())>"Volver al listado"</button>
            <h2>{record.date}</h2>
            <h3>"Comportamiento"</h3>
            <dl>
                <dt>"Duración del picor"</dt><dd>{b.itch_duration}</dd>
                <dt>"Velocidad de rascado"</dt><dd>{b.scratch_speed}</dd>
                <dt>"Intensidad"</dt><dd>{format!("{}/10", b.itch_intensity)}</dd>
                <dt>"Frecuencia"</dt><dd>{b.itch_frequency}</dd>
                <dt>"Vibraciones piel-uña"</dt><dd>{b.skin_to_nail_vibrations}</dd>
            </dl>
            <h3>"Sueño"</h3>
            <dl>
                <dt>"Cambios posturales"</dt><dd>{s.postural_changes}</dd>
                <dt>"Interrupciones"</dt><dd>{s.interruptions}</dd>
                <dt>"Calidad"</dt><dd>{format!("{}%", s.quality_score)}</dd>
            </dl>
            <h3>"Fisiología"</h3>
            <dl>
                <dt>"Frecuencia cardíaca"</dt><dd>{format!("{} lpm", p.heart_rate)}</dd>
                <dt>"Variabilidad"</dt><dd>{format!("{} ms", p.heart_rate_variability)}</dd>
                <dt>"Conductancia de la piel"</dt><dd>{format!("{} µS", p.skin_conductance)}</dd>
                <dt>"Temperatura de la piel"</dt><dd>{format!("{} °C", p.skin_temperature)}</dd>
            </dl>
            <h3>"Datos clínicos"</h3>
            <dl>
                <dt>"Historial"</dt><dd>{c.skin_disease_history.join(", ")}</dd>
                <dt>"Tratamientos previos"</dt><dd>{c.previous_treatments.join(", ")}</dd>
                <dt>"Medicación actual"</dt><dd>{c.current_medication.join(", ")}</dd>
                <dt>"Respuesta al tratamiento"</dt><dd>{c.treatment_response}</dd>
            </dl>
        </section>
    }
}

#[component]
fn QuestionnaireList(questionnaires: Vec<Questionnaire>) -> impl IntoView {
    if questionnaires.is_empty() {
        return view! { <p class="empty-state">"No has completado ningún cuestionario todavía."</p> }.into_any();
    }
    view! {
        <ul class="questionnaire-list">
            {questionnaires
                .into_iter()
                .map(|q| {
                    let level = format!("Nivel de picor: {}/10", q.itch_level);
                    let areas = areas_text(&q.selected_areas);
                    let images = image_count_label(q.image_count);
                    view! {
                        <li class="questionnaire-list__item">
                            <span class="questionnaire-list__date">{q.date}</span>
                            <span>{level}</span>
                            <span>{areas}</span>
                            {images.map(|label| view! { <span class="questionnaire-list__images">{label}</span> })}
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}
