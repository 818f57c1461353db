//! # Anemia Core
//!
//! Decision engine for the KDIGO pathway for anemia in chronic kidney disease.
//!
//! This crate contains pure decision logic:
//! - The patient record and its edit transforms (`record`)
//! - Four stage evaluators: screening, iron status, differential workup and treatment-agent
//!   selection (`evaluators`)
//! - The stage sequencer that gates forward progression (`sequencer`)
//! - Display annotations and batch pathway walks built on top of them
//!
//! **No I/O concerns**: record documents, directory loading and terminal output belong in
//! `anemia-wire`, `anemia-cli` and `anemia-run`.

pub mod advisory;
pub mod config;
pub mod constants;
pub mod decision;
pub mod error;
pub mod evaluators;
pub mod pathway;
pub mod record;
pub mod sequencer;
pub mod stage;
pub mod tsat;
pub mod validation;

pub use advisory::{regulatory_advisory, Advisory};
pub use config::{action_required_policy_from_env_value, ActionRequiredPolicy, CoreConfig};
pub use decision::{Category, DecisionResult, DecisionStatus};
pub use error::{AnemiaError, AnemiaResult};
pub use evaluators::evaluate_stage;
pub use pathway::{walk_pathway, PathwayOutcome, PathwayStep};
pub use record::{Condition, Finding, Group, PatientRecord, RecordEdit, RoutePreference, Sex, Workup};
pub use sequencer::StageSequencer;
pub use stage::Stage;
pub use tsat::derive_transferrin_saturation;

// Re-export the validated lab value so callers need only this crate.
pub use anemia_types::{LabValue, LabValueError};

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(value: f64) -> Option<LabValue> {
        Some(LabValue::new(value).expect("valid lab value"))
    }

    fn busy_record() -> PatientRecord {
        PatientRecord::new()
            .with_group(Some(Group::Pd))
            .with_sex(Some(Sex::Female))
            .with_hemoglobin(lab(8.7))
            .with_ferritin(lab(150.0))
            .with_transferrin_saturation(Some(22))
            .with_finding(Finding::ThyroidAbnormality, true)
            .with_condition(Condition::HepaticImpairment, true)
            .with_esa_hyporesponsive(true)
    }

    #[test]
    fn every_evaluator_is_idempotent_and_leaves_the_record_alone() {
        let record = busy_record();
        let snapshot = record.clone();
        for stage in Stage::ALL {
            assert_eq!(evaluate_stage(stage, &record), evaluate_stage(stage, &record));
        }
        assert_eq!(record, snapshot);
    }

    #[test]
    fn clinician_session_from_empty_record() {
        let mut session = StageSequencer::new(CoreConfig::default());
        session.edit(RecordEdit::Group(Some(Group::Hd)));
        session.edit(RecordEdit::Sex(Some(Sex::Male)));
        session.edit(RecordEdit::Hemoglobin(lab(9.0)));
        assert_eq!(session.result().category, Some(Category::Urgent));
        assert!(session.advance());

        session.edit(RecordEdit::Ferritin(lab(500.0)));
        session.edit(RecordEdit::SerumIron(lab(60.0)));
        session.edit(RecordEdit::TotalIronBindingCapacity(lab(200.0)));
        assert_eq!(session.record().transferrin_saturation(), Some(30));
        assert_eq!(session.result().status, DecisionStatus::ActionRequired);
        assert!(session.result().details[1].contains("monthly"));
        assert!(session.advance());

        assert!(session.edit(RecordEdit::AllCausesExcluded(true)));
        assert_eq!(session.stage(), Stage::TreatmentAgent);

        session.edit(RecordEdit::EsaIntolerance(true));
        session.edit(RecordEdit::Condition(Condition::HistoryOfCancer, true));
        assert_eq!(session.result().title, evaluators::SHARED_DECISION_TITLE);
        assert!(session
            .result()
            .details
            .iter()
            .any(|line| line.contains("History of cancer")));
    }
}
