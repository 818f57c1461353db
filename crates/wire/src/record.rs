//! Patient record documents.
//!
//! Responsibilities:
//! - Define a strict wire model for YAML/JSON record documents
//! - Validate every numeric field and the workup answers while translating to the domain
//! - Render domain records back to documents
//!
//! Translation replays the document as an ordered list of [`RecordEdit`]s, so documents behave
//! like a clinician filling the form top to bottom. Serum iron and TIBC derive TSAT; an explicit
//! `transferrin_saturation` is applied after them and wins, so rendered records parse back unchanged.

use crate::{WireError, WireResult};
use anemia_core::validation::{optional_lab_value, percentage};
use anemia_core::{
    Condition, Finding, Group, PatientRecord, RecordEdit, RoutePreference, Sex, Workup,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialisation format of a record document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension (`.yaml`, `.yml` or `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Public RecordDocument operations
// ============================================================================

/// Record document operations.
///
/// This is a zero-sized type used for namespacing record document operations.
pub struct RecordDocument;

impl RecordDocument {
    /// Parse a patient record from YAML text.
    ///
    /// Schema mismatches are reported with the path of the failing field
    /// (e.g. `treatment.conditions[1]`).
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the YAML does not match the wire schema or contains unknown keys,
    /// - a numeric field is negative or not finite, or TSAT is not a whole number,
    /// - `all_causes_excluded` is set together with specific findings.
    pub fn parse_yaml(yaml_text: &str) -> WireResult<PatientRecord> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire = serde_path_to_error::deserialize::<_, PatientRecordWire>(deserializer)
            .map_err(|err| schema_mismatch(err.path().to_string(), err.into_inner()))?;
        wire_to_domain(wire)
    }

    /// Parse a patient record from JSON text. Same rules as [`RecordDocument::parse_yaml`].
    pub fn parse_json(json_text: &str) -> WireResult<PatientRecord> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire = serde_path_to_error::deserialize::<_, PatientRecordWire>(&mut deserializer)
            .map_err(|err| schema_mismatch(err.path().to_string(), err.into_inner()))?;
        deserializer.end()?;
        wire_to_domain(wire)
    }

    pub fn parse(text: &str, format: DocumentFormat) -> WireResult<PatientRecord> {
        match format {
            DocumentFormat::Yaml => Self::parse_yaml(text),
            DocumentFormat::Json => Self::parse_json(text),
        }
    }

    /// Read and parse a record document, choosing the format from the file extension.
    pub fn read_path(path: &Path) -> WireResult<PatientRecord> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| WireError::UnsupportedFormat(path.display().to_string()))?;
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Render a patient record as YAML text.
    pub fn render_yaml(record: &PatientRecord) -> WireResult<String> {
        serde_yaml::to_string(&domain_to_wire(record))
            .map_err(|e| WireError::Translation(format!("Failed to serialize record: {e}")))
    }

    /// Render a patient record as pretty-printed JSON text.
    pub fn render_json(record: &PatientRecord) -> WireResult<String> {
        Ok(serde_json::to_string_pretty(&domain_to_wire(record))?)
    }
}

fn schema_mismatch(path: String, source: impl std::fmt::Display) -> WireError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    WireError::Translation(format!("Record schema mismatch at {path}: {source}"))
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct PatientRecordWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hemoglobin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ferritin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transferrin_saturation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serum_iron: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_iron_binding_capacity: Option<f64>,
    has_active_infection: bool,
    workup: WorkupWire,
    treatment: TreatmentWire,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct WorkupWire {
    all_causes_excluded: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    findings: Vec<Finding>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct TreatmentWire {
    current_stroke_or_thrombosis: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<Condition>,
    esa_intolerance: bool,
    esa_hyporesponsive: bool,
    high_inflammatory_marker: bool,
    refrigeration_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    route_preference: Option<RoutePreference>,
}

impl Default for TreatmentWire {
    fn default() -> Self {
        Self {
            current_stroke_or_thrombosis: false,
            conditions: Vec::new(),
            esa_intolerance: false,
            esa_hyporesponsive: false,
            high_inflammatory_marker: false,
            refrigeration_access: true,
            route_preference: None,
        }
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Convert a wire document into a validated domain record.
fn wire_to_domain(wire: PatientRecordWire) -> WireResult<PatientRecord> {
    let hemoglobin = optional_lab_value("hemoglobin", wire.hemoglobin)?;
    let ferritin = optional_lab_value("ferritin", wire.ferritin)?;
    let serum_iron = optional_lab_value("serum_iron", wire.serum_iron)?;
    let tibc = optional_lab_value("total_iron_binding_capacity", wire.total_iron_binding_capacity)?;
    let tsat = wire
        .transferrin_saturation
        .map(|raw| percentage("transferrin_saturation", raw))
        .transpose()?;

    if wire.workup.all_causes_excluded && !wire.workup.findings.is_empty() {
        return Err(WireError::Translation(
            "workup.all_causes_excluded cannot be combined with workup.findings".into(),
        ));
    }

    let mut edits = vec![
        RecordEdit::Group(wire.group),
        RecordEdit::Sex(wire.sex),
        RecordEdit::Hemoglobin(hemoglobin),
        RecordEdit::Ferritin(ferritin),
        RecordEdit::SerumIron(serum_iron),
        RecordEdit::TotalIronBindingCapacity(tibc),
    ];
    // Explicit TSAT goes last and overrides the derived value.
    if tsat.is_some() {
        edits.push(RecordEdit::TransferrinSaturation(tsat));
    }
    edits.extend([
        RecordEdit::ActiveInfection(wire.has_active_infection),
        RecordEdit::AllCausesExcluded(wire.workup.all_causes_excluded),
    ]);
    edits.extend(
        wire.workup
            .findings
            .into_iter()
            .map(|finding| RecordEdit::Finding(finding, true)),
    );

    let treatment = wire.treatment;
    edits.push(RecordEdit::StrokeOrThrombosis(
        treatment.current_stroke_or_thrombosis,
    ));
    edits.extend(
        treatment
            .conditions
            .into_iter()
            .map(|condition| RecordEdit::Condition(condition, true)),
    );
    edits.extend([
        RecordEdit::EsaIntolerance(treatment.esa_intolerance),
        RecordEdit::EsaHyporesponsive(treatment.esa_hyporesponsive),
        RecordEdit::HighInflammatoryMarker(treatment.high_inflammatory_marker),
        RecordEdit::RefrigerationAccess(treatment.refrigeration_access),
        RecordEdit::RoutePreference(treatment.route_preference),
    ]);

    Ok(edits
        .into_iter()
        .fold(PatientRecord::default(), |record, edit| edit.apply(record)))
}

/// Convert a domain record into its wire document.
fn domain_to_wire(record: &PatientRecord) -> PatientRecordWire {
    let workup = match record.workup() {
        Workup::AllExcluded => WorkupWire {
            all_causes_excluded: true,
            findings: Vec::new(),
        },
        other => WorkupWire {
            all_causes_excluded: false,
            findings: other.findings(),
        },
    };

    PatientRecordWire {
        group: record.group(),
        sex: record.sex(),
        hemoglobin: record.hemoglobin().map(f64::from),
        ferritin: record.ferritin().map(f64::from),
        transferrin_saturation: record.transferrin_saturation().map(f64::from),
        serum_iron: record.serum_iron().map(f64::from),
        total_iron_binding_capacity: record.total_iron_binding_capacity().map(f64::from),
        has_active_infection: record.has_active_infection(),
        workup,
        treatment: TreatmentWire {
            current_stroke_or_thrombosis: record.current_stroke_or_thrombosis(),
            conditions: record.conditions().collect(),
            esa_intolerance: record.esa_intolerance(),
            esa_hyporesponsive: record.esa_hyporesponsive(),
            high_inflammatory_marker: record.high_inflammatory_marker(),
            refrigeration_access: record.refrigeration_access(),
            route_preference: record.route_preference(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anemia_core::{AnemiaError, LabValue};

    const FULL_RECORD: &str = r#"group: nd_ckd
sex: female
hemoglobin: 9.1
ferritin: 180
transferrin_saturation: 19
has_active_infection: false
workup:
  all_causes_excluded: true
treatment:
  conditions: [prior_thromboembolic_events, pregnancy]
  esa_intolerance: true
  refrigeration_access: false
  route_preference: oral
"#;

    #[test]
    fn parses_full_record() {
        let record = RecordDocument::parse_yaml(FULL_RECORD).expect("parse yaml");
        assert_eq!(record.group(), Some(Group::NdCkd));
        assert_eq!(record.sex(), Some(Sex::Female));
        assert_eq!(record.hemoglobin().map(f64::from), Some(9.1));
        assert_eq!(record.ferritin().map(f64::from), Some(180.0));
        assert_eq!(record.transferrin_saturation(), Some(19));
        assert!(record.workup().all_causes_excluded());
        assert_eq!(
            record.conditions().collect::<Vec<_>>(),
            vec![Condition::Pregnancy, Condition::PriorThromboembolicEvents]
        );
        assert!(record.esa_intolerance());
        assert!(!record.refrigeration_access());
        assert_eq!(record.route_preference(), Some(RoutePreference::Oral));
    }

    #[test]
    fn empty_document_is_an_empty_record() {
        let record = RecordDocument::parse_yaml("{}").expect("empty mapping");
        assert_eq!(record, PatientRecord::default());
        assert!(record.refrigeration_access());
    }

    #[test]
    fn yaml_and_json_agree() {
        let json = r#"{
            "group": "hd",
            "sex": "male",
            "hemoglobin": 12.5,
            "workup": { "findings": ["hemolysis"] }
        }"#;
        let from_json = RecordDocument::parse_json(json).expect("parse json");
        let from_yaml = RecordDocument::parse_yaml(
            "group: hd\nsex: male\nhemoglobin: 12.5\nworkup:\n  findings: [hemolysis]\n",
        )
        .expect("parse yaml");
        assert_eq!(from_json, from_yaml);
        assert!(from_json.workup().has_finding(Finding::Hemolysis));
    }

    #[test]
    fn rendered_yaml_parses_back_to_the_same_record() {
        let record = RecordDocument::parse_yaml(FULL_RECORD).expect("parse yaml");
        let output = RecordDocument::render_yaml(&record).expect("render yaml");
        let reparsed = RecordDocument::parse_yaml(&output).expect("reparse yaml");
        assert_eq!(record, reparsed);
    }

    #[test]
    fn rejects_negative_values_with_field_name() {
        let err = RecordDocument::parse_yaml("ferritin: -12\n").expect_err("negative ferritin");
        match err {
            WireError::Core(AnemiaError::LabValue { field, .. }) => assert_eq!(field, "ferritin"),
            other => panic!("expected LabValue error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_fractional_tsat() {
        let err =
            RecordDocument::parse_yaml("transferrin_saturation: 22.5\n").expect_err("fractional");
        assert!(matches!(
            err,
            WireError::Core(AnemiaError::InvalidPercentage { .. })
        ));
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let err = RecordDocument::parse_yaml("treatment:\n  esa_allergy: true\n")
            .expect_err("unknown key");
        match err {
            WireError::Translation(msg) => {
                assert!(msg.contains("treatment"));
                assert!(msg.contains("esa_allergy"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_group() {
        let err = RecordDocument::parse_yaml("group: icu\n").expect_err("unknown group");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("group")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_contradictory_workup() {
        let err = RecordDocument::parse_yaml(
            "workup:\n  all_causes_excluded: true\n  findings: [paraprotein]\n",
        )
        .expect_err("contradictory workup");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("all_causes_excluded")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn entered_tsat_wins_over_serum_iron_and_tibc() {
        let record = RecordDocument::parse_yaml(
            "transferrin_saturation: 50\nserum_iron: 60\ntotal_iron_binding_capacity: 300\n",
        )
        .expect("parse yaml");
        assert_eq!(record.transferrin_saturation(), Some(50));
    }

    #[test]
    fn serum_iron_and_tibc_derive_tsat_when_none_entered() {
        let record =
            RecordDocument::parse_yaml("serum_iron: 60\ntotal_iron_binding_capacity: 300\n")
                .expect("parse yaml");
        assert_eq!(record.transferrin_saturation(), Some(20));
    }

    #[test]
    fn typed_tsat_after_calculator_survives_yaml_round_trip() {
        let record = PatientRecord::new()
            .with_group(Some(Group::NdCkd))
            .with_ferritin(Some(LabValue::new(150.0).expect("valid")))
            .with_serum_iron(Some(LabValue::new(60.0).expect("valid")))
            .with_total_iron_binding_capacity(Some(LabValue::new(300.0).expect("valid")));
        assert_eq!(record.transferrin_saturation(), Some(20));
        let record = record.with_transferrin_saturation(Some(25));

        let output = RecordDocument::render_yaml(&record).expect("render yaml");
        let reparsed = RecordDocument::parse_yaml(&output).expect("reparse yaml");
        assert_eq!(record, reparsed);
        assert_eq!(reparsed.transferrin_saturation(), Some(25));
    }

    #[test]
    fn rendered_json_parses_back_to_the_same_record() {
        let record = RecordDocument::parse_yaml(FULL_RECORD)
            .expect("parse yaml")
            .with_serum_iron(Some(LabValue::new(48.0).expect("valid")))
            .with_total_iron_binding_capacity(Some(LabValue::new(240.0).expect("valid")))
            .with_transferrin_saturation(Some(19));
        let output = RecordDocument::render_json(&record).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["group"], "nd_ckd");
        assert_eq!(value["transferrin_saturation"].as_f64(), Some(19.0));
        let reparsed = RecordDocument::parse_json(&output).expect("reparse json");
        assert_eq!(record, reparsed);
    }

    #[test]
    fn zero_tibc_keeps_entered_tsat() {
        let record = RecordDocument::parse_yaml(
            "transferrin_saturation: 35\nserum_iron: 60\ntotal_iron_binding_capacity: 0\n",
        )
        .expect("parse yaml");
        assert_eq!(record.transferrin_saturation(), Some(35));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/b.YML")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("record.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("notes.txt")), None);
    }
}
