//! Stage 2: iron status and iron-therapy eligibility.
//!
//! Rules are checked in a fixed priority order; the first one that fires decides the result:
//! 1. ferritin below the severe-deficiency threshold (suspected bleeding),
//! 2. active infection,
//! 3. iron overload (ferritin or TSAT above the stop thresholds),
//! 4. the group-specific start criteria.

use crate::constants::{
    HD_START_FERRITIN, HD_START_TSAT, IRON_OVERLOAD_FERRITIN, IRON_OVERLOAD_TSAT,
    NON_HD_LOW_BAND_TSAT, NON_HD_LOW_FERRITIN, NON_HD_MID_BAND_TSAT, NON_HD_MID_FERRITIN,
    SEVERE_DEFICIENCY_FERRITIN,
};
use crate::decision::{Category, DecisionResult, DecisionStatus};
use crate::record::{Group, PatientRecord};

/// How iron should be given and how often labs are repeated, once iron is started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IronPlan {
    pub route: &'static str,
    pub rationale: &'static str,
    pub monitoring: &'static str,
}

/// Group-specific start test. Returns the plan when iron should be started.
///
/// Only meaningful after the deficiency, infection and overload rules have been ruled out.
pub fn iron_start_plan(group: Group, ferritin: f64, tsat: u32) -> Option<IronPlan> {
    match group {
        Group::Hd => (ferritin <= HD_START_FERRITIN && tsat <= HD_START_TSAT).then_some(IronPlan {
            route: "Intravenous (IV) iron",
            rationale: "Standard therapy for hemodialysis patients.",
            monitoring: "monthly",
        }),
        Group::Pd | Group::NdCkd | Group::Ktx => {
            let low_band = ferritin < NON_HD_LOW_FERRITIN && tsat < NON_HD_LOW_BAND_TSAT;
            let mid_band = (NON_HD_LOW_FERRITIN..=NON_HD_MID_FERRITIN).contains(&ferritin)
                && tsat < NON_HD_MID_BAND_TSAT;
            (low_band || mid_band).then_some(IronPlan {
                route: "Oral or intravenous iron",
                rationale: "Based on patient values and preference. Switch to IV if oral iron is ineffective or not tolerated.",
                monitoring: "every 3 months",
            })
        }
    }
}

pub fn evaluate_iron_therapy(record: &PatientRecord) -> DecisionResult {
    let (Some(ferritin), Some(tsat), Some(group)) = (
        record.ferritin(),
        record.transferrin_saturation(),
        record.group(),
    ) else {
        return DecisionResult::awaiting_input();
    };
    let ferritin = ferritin.get();

    if ferritin < SEVERE_DEFICIENCY_FERRITIN {
        return DecisionResult::new(
            DecisionStatus::Stop,
            Category::Urgent,
            "Severe iron deficiency detected",
            "Ferritin < 45 ng/mL. Suspect occult bleeding.",
        )
        .with_details([
            "Urology referral: evaluate hematuria",
            "Gynecology referral: evaluate menstrual blood loss",
            "Gastroenterology referral: evaluate occult gastrointestinal bleeding",
        ]);
    }

    if record.has_active_infection() {
        return DecisionResult::new(
            DecisionStatus::Stop,
            Category::Urgent,
            "Hold iron therapy",
            "Iron therapy should be held during active infection.",
        );
    }

    if ferritin > IRON_OVERLOAD_FERRITIN || tsat >= IRON_OVERLOAD_TSAT {
        // Still anaemic, so the pathway proceeds to the differential workup.
        return DecisionResult::new(
            DecisionStatus::Continue,
            Category::Info,
            "Iron stores adequate / excessive",
            "Iron parameters exceed the upper limits for iron therapy.",
        )
        .with_details([
            "Do not start iron therapy.",
            "If iron is currently being given, stop it.",
            "Continue to investigate other causes (stage 3).",
        ]);
    }

    match iron_start_plan(group, ferritin, tsat) {
        Some(plan) => DecisionResult::new(
            DecisionStatus::ActionRequired,
            Category::Treatment,
            "Start iron therapy",
            format!("Recommended route: {}", plan.route),
        )
        .with_details([
            plan.rationale.to_string(),
            format!("Monitor Hb, ferritin and TSAT {}.", plan.monitoring),
            "Stop iron therapy if ferritin > 700 ng/mL or TSAT >= 40%.".to_string(),
        ]),
        None => DecisionResult::new(
            DecisionStatus::Continue,
            Category::Info,
            "Iron stores adequate",
            "Iron start criteria not met. Proceed to the full anemia workup.",
        ),
    }
}
