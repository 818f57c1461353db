//! Stage 4: choosing between an ESA and a HIF-PHI.
//!
//! After the hemoglobin gate, tiers are evaluated in strict priority and the first match wins:
//!
//! 1. current stroke or thrombosis: hold every agent,
//! 2. HIF-PHI-cautioned history together with ESA intolerance: shared decision making,
//! 3. HIF-PHI-cautioned history: ESA,
//! 4. ESA intolerance: HIF-PHI,
//! 5. poor ESA response or high inflammatory marker: HIF-PHI,
//! 6. oral preference or no refrigeration: HIF-PHI,
//! 7. otherwise: ESA as standard first-line therapy.
//!
//! Each tier lists every reason that qualified within it, in canonical order.

use crate::constants::{AGENT_INITIATION_HB, AGENT_UPPER_TARGET_HB};
use crate::decision::{Category, DecisionResult, DecisionStatus};
use crate::record::{PatientRecord, RoutePreference};

/// Title of every HIF-PHI recommendation. Display annotations key off it.
pub const HIF_PHI_TITLE: &str = "Recommendation: HIF-PHI";

/// Title of every ESA recommendation.
pub const ESA_TITLE: &str = "Recommendation: ESA";

pub const SHARED_DECISION_TITLE: &str = "Shared decision making (SDM)";

const MONITOR_HB: &str = "Monitor Hb every 2-4 weeks.";
const WITHDRAW_RULE: &str = "Withdraw if the response is inadequate after 3-4 months.";

/// Anemia treatment agent class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentClass {
    /// Erythropoiesis-stimulating agent.
    Esa,
    /// Hypoxia-inducible-factor prolyl-hydroxylase inhibitor.
    HifPhi,
}

impl AgentClass {
    pub fn title(self) -> &'static str {
        match self {
            AgentClass::Esa => ESA_TITLE,
            AgentClass::HifPhi => HIF_PHI_TITLE,
        }
    }
}

fn recommend(agent: AgentClass, message: &str) -> DecisionResult {
    DecisionResult::new(
        DecisionStatus::Stop,
        Category::Treatment,
        agent.title(),
        message,
    )
}

fn response_reasons(record: &PatientRecord) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if record.esa_hyporesponsive() {
        reasons.push("ESA hyporesponsiveness");
    }
    if record.high_inflammatory_marker() {
        reasons.push("Elevated CRP (> 0.3 mg/dL)");
    }
    reasons
}

fn logistics_reasons(record: &PatientRecord) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    match record.route_preference() {
        Some(RoutePreference::Oral) => reasons.push("Patient prefers oral medication"),
        Some(RoutePreference::Injection) | None => {}
    }
    if !record.refrigeration_access() {
        reasons.push("No access to refrigeration");
    }
    reasons
}

pub fn evaluate_treatment_agent(record: &PatientRecord) -> DecisionResult {
    let below_initiation = record
        .hemoglobin()
        .is_some_and(|hb| hb.get() <= AGENT_INITIATION_HB);
    if !below_initiation {
        return DecisionResult::new(
            DecisionStatus::Stop,
            Category::Info,
            "Observation recommended",
            "Hb is above the typical threshold for starting an anemia treatment agent (> 10 g/dL).",
        )
        .with_details([
            MONITOR_HB,
            "Treatment is usually considered once Hb < 10 g/dL.",
        ]);
    }

    if record.current_stroke_or_thrombosis() {
        return DecisionResult::new(
            DecisionStatus::Stop,
            Category::Urgent,
            "Hold treatment",
            "Recent stroke or thrombosis detected.",
        )
        .with_details([
            "Hold ESA and HIF-PHI therapy immediately.",
            "Reassess once the patient is stable.",
        ]);
    }

    let cautions: Vec<&'static str> = record.conditions().map(|c| c.label()).collect();

    if !cautions.is_empty() && record.esa_intolerance() {
        let mut details = vec![
            "Conflict detected:".to_string(),
            "- The patient is intolerant of ESA (ESA contraindicated).".to_string(),
            "- The patient has conditions in which HIF-PHI is generally not recommended:"
                .to_string(),
        ];
        details.extend(cautions.iter().map(|label| format!("  ** {label}")));
        details.push("Consider specialist consultation (hematology/nephrology).".to_string());
        return DecisionResult::new(
            DecisionStatus::Stop,
            Category::Urgent,
            SHARED_DECISION_TITLE,
            "Potential benefits and harms must be discussed carefully. Transfusion may be the only option.",
        )
        .with_details(details);
    }

    if !cautions.is_empty() {
        return recommend(AgentClass::Esa, "Clinical history favours an ESA.")
            .with_details(["HIF-PHI relative contraindications or cautions:"])
            .with_details(cautions)
            .with_details([
                "HIF-PHI is generally not recommended, or must be used with caution, in these conditions.",
                "Use the lowest effective dose.",
            ]);
    }

    if record.esa_intolerance() {
        return recommend(
            AgentClass::HifPhi,
            "Clinical history (ESA intolerance) favours a HIF-PHI.",
        )
        .with_details([
            "Reason (ESA intolerance):",
            "Unable to tolerate ESA (allergy, hypertension, clotting)",
            MONITOR_HB,
        ]);
    }

    let reasons = response_reasons(record);
    if !reasons.is_empty() {
        return recommend(
            AgentClass::HifPhi,
            "Clinical status favours a HIF-PHI as the preferred alternative.",
        )
        .with_details(["Reasons:"])
        .with_details(reasons)
        .with_details([WITHDRAW_RULE, MONITOR_HB]);
    }

    let reasons = logistics_reasons(record);
    if !reasons.is_empty() {
        return recommend(
            AgentClass::HifPhi,
            "Patient preference or logistics favour a HIF-PHI.",
        )
        .with_details(["Reasons:"])
        .with_details(reasons)
        .with_details([WITHDRAW_RULE]);
    }

    recommend(AgentClass::Esa, "Standard first-line therapy.").with_details([
        "No other specific priority criteria were met.".to_string(),
        "ESA is the standard therapy (IV/SC).".to_string(),
        MONITOR_HB.to_string(),
        format!("Do not maintain Hb >= {AGENT_UPPER_TARGET_HB} g/dL."),
    ])
}
