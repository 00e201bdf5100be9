//! Clinical data sources for the dashboards.
//!
//! There is no clinical API yet: patient lists and measurement sessions are
//! fixed sample tables, and questionnaires come from `localStorage` where the
//! questionnaire flow stores them.

use crate::state::clinical::{
    BehavioralData, ClinicalData, PatientRecord, PatientSummary, PhysiologicalData, Questionnaire, SleepData,
};
use crate::util::ui_persistence::load_json;

/// `localStorage` key holding every questionnaire submitted in this browser.
pub const QUESTIONNAIRES_KEY: &str = "vitalytics-questionnaires";

/// All questionnaires stored in this browser (any user). Missing or corrupt data reads as empty.
pub fn load_questionnaires() -> Vec<Questionnaire> {
    load_json(QUESTIONNAIRES_KEY).unwrap_or_default()
}

fn summary(id: &str, name: &str, last_update: &str, condition: &str, severity: u8) -> PatientSummary {
    PatientSummary {
        id: id.to_owned(),
        name: name.to_owned(),
        last_update: last_update.to_owned(),
        condition: condition.to_owned(),
        severity,
    }
}

pub fn patient_summaries() -> Vec<PatientSummary> {
    vec![
        summary("PAT-001", "Juan Pérez", "2023-05-15", "Dermatitis atópica", 75),
        summary("PAT-002", "María García", "2023-05-14", "Eccema", 45),
        summary("PAT-003", "Carlos López", "2023-05-13", "Psoriasis", 60),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn history() -> Vec<String> {
    strings(&["Dermatitis atópica", "Eccema"])
}

fn treatments() -> Vec<String> {
    strings(&["Corticosteroides tópicos", "Antihistamínicos"])
}

pub fn patient_records() -> Vec<PatientRecord> {
    vec![
        PatientRecord {
            id: "pd-1".to_owned(),
            date: "15 de mayo, 2023".to_owned(),
            user_id: "user-1".to_owned(),
            behavioral: BehavioralData {
                itch_duration: "4 horas diarias".to_owned(),
                scratch_speed: 85,
                itch_intensity: 7,
                itch_frequency: 12,
                skin_to_nail_vibrations: "Moderadas".to_owned(),
            },
            sleep: SleepData { postural_changes: 28, interruptions: 6, quality_score: 65 },
            physiological: PhysiologicalData {
                heart_rate: 76,
                heart_rate_variability: 42,
                skin_conductance: 8.3,
                skin_temperature: 36.7,
            },
            clinical: ClinicalData {
                skin_disease_history: history(),
                previous_treatments: treatments(),
                current_medication: strings(&["Cetirizina 10mg", "Loratadina 10mg"]),
                treatment_response: "Respuesta parcial a antihistamínicos, mejor control nocturno".to_owned(),
            },
        },
        PatientRecord {
            id: "pd-2".to_owned(),
            date: "10 de mayo, 2023".to_owned(),
            user_id: "user-1".to_owned(),
            behavioral: BehavioralData {
                itch_duration: "5 horas diarias".to_owned(),
                scratch_speed: 92,
                itch_intensity: 8,
                itch_frequency: 15,
                skin_to_nail_vibrations: "Altas".to_owned(),
            },
            sleep: SleepData { postural_changes: 32, interruptions: 8, quality_score: 55 },
            physiological: PhysiologicalData {
                heart_rate: 82,
                heart_rate_variability: 38,
                skin_conductance: 9.1,
                skin_temperature: 37.2,
            },
            clinical: ClinicalData {
                skin_disease_history: history(),
                previous_treatments: treatments(),
                current_medication: strings(&["Cetirizina 10mg"]),
                treatment_response: "Respuesta limitada a tratamientos actuales".to_owned(),
            },
        },
        PatientRecord {
            id: "pd-3".to_owned(),
            date: "1 de mayo, 2023".to_owned(),
            user_id: "user-1".to_owned(),
            behavioral: BehavioralData {
                itch_duration: "3 horas diarias".to_owned(),
                scratch_speed: 76,
                itch_intensity: 6,
                itch_frequency: 10,
                skin_to_nail_vibrations: "Bajas".to_owned(),
            },
            sleep: SleepData { postural_changes: 25, interruptions: 4, quality_score: 72 },
            physiological: PhysiologicalData {
                heart_rate: 74,
                heart_rate_variability: 45,
                skin_conductance: 7.8,
                skin_temperature: 36.5,
            },
            clinical: ClinicalData {
                skin_disease_history: history(),
                previous_treatments: treatments(),
                current_medication: strings(&["Cetirizina 10mg", "Loratadina 10mg", "Crema hidratante"]),
                treatment_response: "Mejoría con la combinación de tratamientos".to_owned(),
            },
        },
    ]
}
