//! Clinical data models and the view math behind the results dashboards.
//!
//! DESIGN
//! ======
//! Pages stay thin: filtering, per-user selection and summary figures live
//! here as plain functions over slices.

#[cfg(test)]
#[path = "clinical_test.rs"]
mod clinical_test;

use serde::{Deserialize, Serialize};

/// One row of the doctor's patient list.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub last_update: String,
    pub condition: String,
    /// Percentage, 0..=100.
    pub severity: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BehavioralData {
    pub itch_duration: String,
    pub scratch_speed: u32,
    /// 0..=10.
    pub itch_intensity: u8,
    pub itch_frequency: u32,
    pub skin_to_nail_vibrations: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SleepData {
    pub postural_changes: u32,
    pub interruptions: u32,
    pub quality_score: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhysiologicalData {
    pub heart_rate: u32,
    pub heart_rate_variability: u32,
    pub skin_conductance: f64,
    pub skin_temperature: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClinicalData {
    pub skin_disease_history: Vec<String>,
    pub previous_treatments: Vec<String>,
    pub current_medication: Vec<String>,
    pub treatment_response: String,
}

/// A captured measurement session for one patient.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord {
    pub id: String,
    pub date: String,
    pub user_id: String,
    pub behavioral: BehavioralData,
    pub sleep: SleepData,
    pub physiological: PhysiologicalData,
    pub clinical: ClinicalData,
}

/// A completed symptom questionnaire as stored in the browser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: String,
    pub date: String,
    pub itch_level: f64,
    #[serde(default)]
    pub selected_areas: Vec<String>,
    #[serde(default)]
    pub image_count: u32,
    pub user_id: String,
}

/// Headline figures on the patient dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultsSummary {
    pub questionnaires_completed: usize,
    /// Rounded mean itch level; `None` without questionnaires.
    pub average_itch: Option<i64>,
    pub measurements: usize,
}

impl ResultsSummary {
    pub fn average_itch_label(&self) -> String {
        self.average_itch.map_or_else(|| "N/A".to_owned(), |avg| avg.to_string())
    }
}

/// Case-insensitive search across name, id and condition.
pub fn filter_patients<'a>(patients: &'a [PatientSummary], term: &str) -> Vec<&'a PatientSummary> {
    let needle = term.trim().to_lowercase();
    patients
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.id.to_lowercase().contains(&needle)
                || p.condition.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn records_for_user<'a>(records: &'a [PatientRecord], user_id: &str) -> Vec<&'a PatientRecord> {
    records.iter().filter(|r| r.user_id == user_id).collect()
}

pub fn questionnaires_for_user<'a>(questionnaires: &'a [Questionnaire], user_id: &str) -> Vec<&'a Questionnaire> {
    questionnaires.iter().filter(|q| q.user_id == user_id).collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn summarize(questionnaires: &[&Questionnaire], records: &[&PatientRecord]) -> ResultsSummary {
    let average_itch = if questionnaires.is_empty() {
        None
    } else {
        let total: f64 = questionnaires.iter().map(|q| q.itch_level).sum();
        Some((total / questionnaires.len() as f64).round() as i64)
    };
    ResultsSummary {
        questionnaires_completed: questionnaires.len(),
        average_itch,
        measurements: records.len(),
    }
}

/// Attachment caption, or `None` when nothing is attached.
pub fn image_count_label(count: u32) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 imagen adjunta".to_owned()),
        n => Some(format!("{n} imágenes adjuntas")),
    }
}

/// Severity clamped to a progress-bar percentage.
pub fn severity_percent(severity: u8) -> u8 {
    severity.min(100)
}
