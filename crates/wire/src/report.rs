//! Rendering evaluation reports for display collaborators.

use crate::{WireError, WireResult};
use anemia_core::{PathwayOutcome, PathwayStep};
use serde::Serialize;

/// One line of batch output: the source document and either its pathway or why it failed.
#[derive(Clone, Debug, Serialize)]
pub struct RecordReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PathwayOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordReport {
    pub fn evaluated(source: impl Into<String>, outcome: PathwayOutcome) -> Self {
        Self {
            source: source.into(),
            outcome: Some(outcome),
            error: None,
        }
    }

    pub fn failed(source: impl Into<String>, error: &WireError) -> Self {
        Self {
            source: source.into(),
            outcome: None,
            error: Some(error.to_string()),
        }
    }
}

/// Report rendering operations.
pub struct Report;

impl Report {
    /// A single stage result as pretty JSON.
    pub fn step_json(step: &PathwayStep) -> WireResult<String> {
        Ok(serde_json::to_string_pretty(step)?)
    }

    /// A single stage result as YAML.
    pub fn step_yaml(step: &PathwayStep) -> WireResult<String> {
        Ok(serde_yaml::to_string(step)?)
    }

    /// A full pathway walk as pretty JSON.
    pub fn outcome_json(outcome: &PathwayOutcome) -> WireResult<String> {
        Ok(serde_json::to_string_pretty(outcome)?)
    }

    /// A batch line as compact single-line JSON.
    pub fn record_line(report: &RecordReport) -> WireResult<String> {
        Ok(serde_json::to_string(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anemia_core::{
        walk_pathway, CoreConfig, DecisionResult, Group, LabValue, PatientRecord, Sex, Stage,
        StageSequencer,
    };

    #[test]
    fn step_json_uses_snake_case_enums() {
        let step = PathwayStep {
            stage: Stage::IronTherapy,
            result: DecisionResult::awaiting_input(),
            advisory: None,
        };
        let json = Report::step_json(&step).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["stage"], "iron_therapy");
        assert_eq!(value["result"]["status"], "continue");
        assert!(value["result"].get("category").is_none());
        assert!(value.get("advisory").is_none());
    }

    #[test]
    fn record_line_is_single_line() {
        let record = PatientRecord::new()
            .with_group(Some(Group::Ktx))
            .with_sex(Some(Sex::Male))
            .with_hemoglobin(Some(LabValue::new(14.2).expect("valid")));
        let mut sequencer = StageSequencer::with_record(CoreConfig::default(), record);
        let outcome = walk_pathway(&mut sequencer);

        let line = Report::record_line(&RecordReport::evaluated("ktx.yaml", outcome))
            .expect("render line");
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["source"], "ktx.yaml");
        assert_eq!(value["outcome"]["final_stage"], "screening");
        assert_eq!(value["outcome"]["steps"][0]["result"]["status"], "stop");
    }

    #[test]
    fn failed_report_carries_the_error_text() {
        let err = WireError::Translation("bad document".into());
        let line = Report::record_line(&RecordReport::failed("bad.yaml", &err)).expect("render");
        assert!(line.contains("translation error: bad document"));
        assert!(!line.contains("outcome"));
    }
}
