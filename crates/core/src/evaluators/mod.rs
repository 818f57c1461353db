//! Stage evaluators.
//!
//! Each evaluator is a pure function of the patient record: no logging, no I/O and no
//! mutation. Evaluators never call one another; the sequencer picks the one for the active
//! stage via [`evaluate_stage`].

pub mod iron;
pub mod screening;
pub mod treatment;
pub mod workup;

pub use iron::{evaluate_iron_therapy, iron_start_plan, IronPlan};
pub use screening::{evaluate_screening, is_anemic};
pub use treatment::{
    evaluate_treatment_agent, AgentClass, ESA_TITLE, HIF_PHI_TITLE, SHARED_DECISION_TITLE,
};
pub use workup::evaluate_workup;

use crate::decision::DecisionResult;
use crate::record::PatientRecord;
use crate::stage::Stage;

/// Runs the evaluator that belongs to `stage`.
pub fn evaluate_stage(stage: Stage, record: &PatientRecord) -> DecisionResult {
    match stage {
        Stage::Screening => evaluate_screening(record),
        Stage::IronTherapy => evaluate_iron_therapy(record),
        Stage::Workup => evaluate_workup(record),
        Stage::TreatmentAgent => evaluate_treatment_agent(record),
    }
}
