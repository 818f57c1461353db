//! Stage 3: differential workup for non-renal causes of anemia.

use crate::decision::{Category, DecisionResult, DecisionStatus};
use crate::record::{PatientRecord, Workup};

pub fn evaluate_workup(record: &PatientRecord) -> DecisionResult {
    match record.workup() {
        Workup::AllExcluded => DecisionResult::new(
            DecisionStatus::Continue,
            Category::Treatment,
            "Diagnosis: anemia of CKD",
            "Other causes have been excluded and iron stores are adequate. Proceed to ESA/HIF-PHI evaluation.",
        ),
        workup if workup.has_selection() => DecisionResult::new(
            DecisionStatus::Stop,
            Category::Urgent,
            "Treat the underlying cause",
            "Non-renal causes of anemia were identified. Address them before treating renal anemia.",
        )
        .with_details(workup.findings().into_iter().map(|finding| finding.action())),
        _ => DecisionResult::new(
            DecisionStatus::ActionRequired,
            Category::Info,
            "Perform a full anemia workup",
            "Other causes must be excluded before diagnosing renal anemia. Perform the tests below and record the results.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Finding;

    #[test]
    fn nothing_selected_requires_workup() {
        let result = evaluate_workup(&PatientRecord::new());
        assert_eq!(result.status, DecisionStatus::ActionRequired);
        assert_eq!(result.category, Some(Category::Info));
        assert!(result.details.is_empty());
    }

    #[test]
    fn all_excluded_diagnoses_ckd_anemia() {
        let result = evaluate_workup(&PatientRecord::new().with_all_causes_excluded(true));
        assert_eq!(result.status, DecisionStatus::Continue);
        assert_eq!(result.category, Some(Category::Treatment));
        assert_eq!(result.title, "Diagnosis: anemia of CKD");
    }

    #[test]
    fn findings_stop_with_one_line_each_in_canonical_order() {
        let record = PatientRecord::new()
            .with_finding(Finding::ParasiticInfection, true)
            .with_finding(Finding::Hemolysis, true)
            .with_finding(Finding::ElevatedParathyroidHormone, true);

        let result = evaluate_workup(&record);
        assert_eq!(result.status, DecisionStatus::Stop);
        assert_eq!(result.category, Some(Category::Urgent));
        assert_eq!(
            result.details,
            vec![
                "Hemolysis (haptoglobin/LDH): refer to hematology",
                "Elevated parathyroid hormone (PTH): treat hyperparathyroidism",
                "Parasitic infection detected: refer to infectious diseases",
            ]
        );
    }

    #[test]
    fn every_finding_maps_to_its_own_action() {
        let record = Finding::ALL
            .iter()
            .fold(PatientRecord::new(), |r, f| r.with_finding(*f, true));
        let result = evaluate_workup(&record);
        let expected: Vec<String> = Finding::ALL.iter().map(|f| f.action().to_string()).collect();
        assert_eq!(result.details, expected);
    }

    #[test]
    fn empty_findings_variant_is_treated_as_pending() {
        let record = PatientRecord::new().with_workup(Workup::Findings(Default::default()));
        assert_eq!(
            evaluate_workup(&record).status,
            DecisionStatus::ActionRequired
        );
    }
}
