//! Stage 1: is the patient anaemic?

use crate::constants::{FEMALE_ANEMIA_HB, MALE_ANEMIA_HB};
use crate::decision::{Category, DecisionResult, DecisionStatus};
use crate::record::{PatientRecord, Sex};

/// Sex-specific anemia test. Thresholds are strict: Hb equal to the threshold is not anaemic.
pub fn is_anemic(sex: Sex, hemoglobin: f64) -> bool {
    match sex {
        Sex::Male => hemoglobin < MALE_ANEMIA_HB,
        Sex::Female => hemoglobin < FEMALE_ANEMIA_HB,
    }
}

pub fn evaluate_screening(record: &PatientRecord) -> DecisionResult {
    let (Some(hemoglobin), Some(sex)) = (record.hemoglobin(), record.sex()) else {
        return DecisionResult::awaiting_input();
    };

    if !is_anemic(sex, hemoglobin.get()) {
        return DecisionResult::new(
            DecisionStatus::Stop,
            Category::Treatment,
            "No anemia detected",
            "The patient does not meet the KDIGO criteria for anemia; this guideline does not apply.",
        )
        .with_details([
            format!("Male threshold: < {MALE_ANEMIA_HB} g/dL"),
            format!("Female threshold: < {FEMALE_ANEMIA_HB} g/dL"),
            format!("Patient hemoglobin (Hb): {hemoglobin} g/dL"),
        ]);
    }

    DecisionResult::new(
        DecisionStatus::Continue,
        Category::Urgent,
        "Anemia confirmed",
        "Hemoglobin level indicates anemia. Proceed to iron therapy evaluation.",
    )
    .with_details([format!("Patient hemoglobin (Hb): {hemoglobin} g/dL")])
}
