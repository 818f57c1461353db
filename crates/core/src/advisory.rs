//! Display annotations that sit beside a decision result.
//!
//! These are presentation rules, not branches of the decision logic: they look at a finished
//! result (by title) and the patient group, and never change the recommendation itself.

use crate::decision::DecisionResult;
use crate::evaluators::HIF_PHI_TITLE;
use crate::record::Group;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub title: String,
    pub message: String,
    pub considerations: Vec<String>,
}

/// Regulatory caveat shown when a HIF-PHI is recommended for a non-dialysis CKD patient.
pub fn regulatory_advisory(result: &DecisionResult, group: Option<Group>) -> Option<Advisory> {
    if result.title != HIF_PHI_TITLE || group != Some(Group::NdCkd) {
        return None;
    }

    Some(Advisory {
        title: "Regulatory warning".to_string(),
        message: "HIF-PHI may not be approved or reimbursed for non-dialysis CKD; confirm the current product label before prescribing.".to_string(),
        considerations: vec![
            "Discuss the risks and benefits of off-label use with the patient.".to_string(),
            "Evaluate alternatives (e.g. red blood cell transfusion when symptomatic).".to_string(),
            "Seek nephrology/hematology specialist advice.".to_string(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Category, DecisionStatus};
    use crate::evaluators::ESA_TITLE;

    fn titled(title: &str) -> DecisionResult {
        DecisionResult::new(DecisionStatus::Stop, Category::Treatment, title, "")
    }

    #[test]
    fn fires_for_hif_phi_in_nd_ckd() {
        let advisory = regulatory_advisory(&titled(HIF_PHI_TITLE), Some(Group::NdCkd))
            .expect("advisory expected");
        assert_eq!(advisory.considerations.len(), 3);
    }

    #[test]
    fn silent_for_other_groups_and_titles() {
        assert!(regulatory_advisory(&titled(HIF_PHI_TITLE), Some(Group::Hd)).is_none());
        assert!(regulatory_advisory(&titled(HIF_PHI_TITLE), None).is_none());
        assert!(regulatory_advisory(&titled(ESA_TITLE), Some(Group::NdCkd)).is_none());
    }
}
