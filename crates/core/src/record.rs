//! Patient record domain model.
//!
//! A [`PatientRecord`] holds every clinical input collected so far in a session. It is never
//! mutated in place: each edit produces a new value through a `with_*` transform (or the
//! equivalent [`RecordEdit`]), so evaluators always observe a complete, consistent record.

use crate::tsat::derive_transferrin_saturation;
use anemia_types::LabValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// CKD patient subgroup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    /// Haemodialysis.
    Hd,
    /// Peritoneal dialysis.
    Pd,
    /// Non-dialysis CKD.
    NdCkd,
    /// Kidney transplant.
    Ktx,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Preferred administration route for an anemia treatment agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePreference {
    Oral,
    Injection,
}

/// Non-renal cause of anemia found during the differential workup.
///
/// Declaration order is the canonical reporting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    BloodSmearAbnormality,
    Hemolysis,
    ElevatedInflammatoryMarker,
    B12FolateDeficiency,
    LiverFunctionAbnormality,
    ThyroidAbnormality,
    ElevatedParathyroidHormone,
    Paraprotein,
    ParasiticInfection,
}

impl Finding {
    pub const ALL: [Finding; 9] = [
        Finding::BloodSmearAbnormality,
        Finding::Hemolysis,
        Finding::ElevatedInflammatoryMarker,
        Finding::B12FolateDeficiency,
        Finding::LiverFunctionAbnormality,
        Finding::ThyroidAbnormality,
        Finding::ElevatedParathyroidHormone,
        Finding::Paraprotein,
        Finding::ParasiticInfection,
    ];

    /// The referral or action line reported for this finding.
    pub fn action(self) -> &'static str {
        match self {
            Finding::BloodSmearAbnormality => {
                "Abnormal peripheral blood smear: refer to hematology"
            }
            Finding::Hemolysis => "Hemolysis (haptoglobin/LDH): refer to hematology",
            Finding::ElevatedInflammatoryMarker => {
                "Elevated CRP (inflammation): follow up and treat the underlying disease"
            }
            Finding::B12FolateDeficiency => "Vitamin B12/folate deficiency: treat the deficiency",
            Finding::LiverFunctionAbnormality => {
                "Abnormal liver function: refer to hepatology/gastroenterology"
            }
            Finding::ThyroidAbnormality => "Abnormal thyroid function (TSH): refer to endocrinology",
            Finding::ElevatedParathyroidHormone => {
                "Elevated parathyroid hormone (PTH): treat hyperparathyroidism"
            }
            Finding::Paraprotein => {
                "Suspected myeloma (M-protein/light chains): refer to oncology"
            }
            Finding::ParasiticInfection => {
                "Parasitic infection detected: refer to infectious diseases"
            }
        }
    }
}

/// Clinical history in which an ESA is preferred and HIF-PHI is cautioned against.
///
/// Declaration order is the canonical reporting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Pregnancy,
    ActiveMalignancy,
    HistoryOfCancer,
    PolycysticKidneyDisease,
    ProliferativeRetinopathy,
    PulmonaryArterialHypertension,
    HepaticImpairment,
    PriorCardiovascularEvents,
    PriorThromboembolicEvents,
}

impl Condition {
    pub const ALL: [Condition; 9] = [
        Condition::Pregnancy,
        Condition::ActiveMalignancy,
        Condition::HistoryOfCancer,
        Condition::PolycysticKidneyDisease,
        Condition::ProliferativeRetinopathy,
        Condition::PulmonaryArterialHypertension,
        Condition::HepaticImpairment,
        Condition::PriorCardiovascularEvents,
        Condition::PriorThromboembolicEvents,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Condition::Pregnancy => "Pregnancy",
            Condition::ActiveMalignancy => "Active malignancy",
            Condition::HistoryOfCancer => {
                "History of cancer (not in complete remission for 2-5 years)"
            }
            Condition::PolycysticKidneyDisease => "Polycystic kidney disease",
            Condition::ProliferativeRetinopathy => "Proliferative retinopathy",
            Condition::PulmonaryArterialHypertension => "Pulmonary arterial hypertension",
            Condition::HepaticImpairment => "Hepatic impairment",
            Condition::PriorCardiovascularEvents => {
                "Prior cardiovascular events (stroke/myocardial infarction)"
            }
            Condition::PriorThromboembolicEvents => {
                "Prior thromboembolic events (DVT, vascular access thrombosis, PE)"
            }
        }
    }
}

/// Outcome of the differential workup checklist.
///
/// "All causes excluded" and specific findings are mutually exclusive by construction.
/// `Findings` is never empty when built through [`Workup::from_findings`] or the `with_*`
/// transforms; removing the last finding returns to `Pending`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Workup {
    /// Nothing recorded yet.
    #[default]
    Pending,
    /// Every secondary cause has been excluded.
    AllExcluded,
    /// One or more secondary causes were found.
    Findings(BTreeSet<Finding>),
}

impl Workup {
    pub fn from_findings(findings: impl IntoIterator<Item = Finding>) -> Self {
        let findings: BTreeSet<Finding> = findings.into_iter().collect();
        if findings.is_empty() {
            Workup::Pending
        } else {
            Workup::Findings(findings)
        }
    }

    /// True once the clinician has ticked at least one item of the checklist.
    pub fn has_selection(&self) -> bool {
        match self {
            Workup::Pending => false,
            Workup::AllExcluded => true,
            Workup::Findings(findings) => !findings.is_empty(),
        }
    }

    pub fn all_causes_excluded(&self) -> bool {
        matches!(self, Workup::AllExcluded)
    }

    /// Findings in canonical order.
    pub fn findings(&self) -> Vec<Finding> {
        match self {
            Workup::Findings(findings) => findings.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_finding(&self, finding: Finding) -> bool {
        matches!(self, Workup::Findings(findings) if findings.contains(&finding))
    }

    /// Ticks or unticks "all causes excluded". Ticking clears every finding.
    pub fn with_all_causes_excluded(self, excluded: bool) -> Self {
        match (excluded, self) {
            (true, _) => Workup::AllExcluded,
            (false, Workup::AllExcluded) => Workup::Pending,
            (false, other) => other,
        }
    }

    /// Ticks or unticks a specific finding. Ticking clears "all causes excluded".
    pub fn with_finding(self, finding: Finding, present: bool) -> Self {
        if !present && !matches!(self, Workup::Findings(_)) {
            return self;
        }
        let mut findings = match self {
            Workup::Findings(findings) => findings,
            Workup::Pending | Workup::AllExcluded => BTreeSet::new(),
        };
        if present {
            findings.insert(finding);
        } else {
            findings.remove(&finding);
        }
        Workup::from_findings(findings)
    }
}

/// All clinical inputs collected in one session.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord {
    group: Option<Group>,
    sex: Option<Sex>,
    hemoglobin: Option<LabValue>,
    ferritin: Option<LabValue>,
    transferrin_saturation: Option<u32>,
    serum_iron: Option<LabValue>,
    total_iron_binding_capacity: Option<LabValue>,
    has_active_infection: bool,
    workup: Workup,
    current_stroke_or_thrombosis: bool,
    conditions: BTreeSet<Condition>,
    esa_intolerance: bool,
    esa_hyporesponsive: bool,
    high_inflammatory_marker: bool,
    refrigeration_access: bool,
    route_preference: Option<RoutePreference>,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            group: None,
            sex: None,
            hemoglobin: None,
            ferritin: None,
            transferrin_saturation: None,
            serum_iron: None,
            total_iron_binding_capacity: None,
            has_active_infection: false,
            workup: Workup::Pending,
            current_stroke_or_thrombosis: false,
            conditions: BTreeSet::new(),
            esa_intolerance: false,
            esa_hyporesponsive: false,
            high_inflammatory_marker: false,
            refrigeration_access: true,
            route_preference: None,
        }
    }
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self) -> Option<Group> {
        self.group
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn hemoglobin(&self) -> Option<LabValue> {
        self.hemoglobin
    }

    pub fn ferritin(&self) -> Option<LabValue> {
        self.ferritin
    }

    pub fn transferrin_saturation(&self) -> Option<u32> {
        self.transferrin_saturation
    }

    pub fn serum_iron(&self) -> Option<LabValue> {
        self.serum_iron
    }

    pub fn total_iron_binding_capacity(&self) -> Option<LabValue> {
        self.total_iron_binding_capacity
    }

    pub fn has_active_infection(&self) -> bool {
        self.has_active_infection
    }

    pub fn workup(&self) -> &Workup {
        &self.workup
    }

    pub fn current_stroke_or_thrombosis(&self) -> bool {
        self.current_stroke_or_thrombosis
    }

    /// HIF-PHI-cautioned conditions in canonical order.
    pub fn conditions(&self) -> impl Iterator<Item = Condition> + '_ {
        self.conditions.iter().copied()
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn esa_intolerance(&self) -> bool {
        self.esa_intolerance
    }

    pub fn esa_hyporesponsive(&self) -> bool {
        self.esa_hyporesponsive
    }

    pub fn high_inflammatory_marker(&self) -> bool {
        self.high_inflammatory_marker
    }

    pub fn refrigeration_access(&self) -> bool {
        self.refrigeration_access
    }

    pub fn route_preference(&self) -> Option<RoutePreference> {
        self.route_preference
    }

    pub fn with_group(self, group: Option<Group>) -> Self {
        Self { group, ..self }
    }

    pub fn with_sex(self, sex: Option<Sex>) -> Self {
        Self { sex, ..self }
    }

    pub fn with_hemoglobin(self, hemoglobin: Option<LabValue>) -> Self {
        Self { hemoglobin, ..self }
    }

    pub fn with_ferritin(self, ferritin: Option<LabValue>) -> Self {
        Self { ferritin, ..self }
    }

    pub fn with_transferrin_saturation(self, transferrin_saturation: Option<u32>) -> Self {
        Self {
            transferrin_saturation,
            ..self
        }
    }

    /// Sets serum iron and, when TIBC is also known and non-zero, recomputes TSAT.
    pub fn with_serum_iron(self, serum_iron: Option<LabValue>) -> Self {
        Self { serum_iron, ..self }.with_derived_saturation()
    }

    /// Sets TIBC and, when serum iron is also known and TIBC is non-zero, recomputes TSAT.
    pub fn with_total_iron_binding_capacity(
        self,
        total_iron_binding_capacity: Option<LabValue>,
    ) -> Self {
        Self {
            total_iron_binding_capacity,
            ..self
        }
        .with_derived_saturation()
    }

    pub fn with_active_infection(self, has_active_infection: bool) -> Self {
        Self {
            has_active_infection,
            ..self
        }
    }

    pub fn with_workup(self, workup: Workup) -> Self {
        Self { workup, ..self }
    }

    pub fn with_all_causes_excluded(mut self, excluded: bool) -> Self {
        self.workup = std::mem::take(&mut self.workup).with_all_causes_excluded(excluded);
        self
    }

    pub fn with_finding(mut self, finding: Finding, present: bool) -> Self {
        self.workup = std::mem::take(&mut self.workup).with_finding(finding, present);
        self
    }

    pub fn with_stroke_or_thrombosis(self, current_stroke_or_thrombosis: bool) -> Self {
        Self {
            current_stroke_or_thrombosis,
            ..self
        }
    }

    pub fn with_condition(mut self, condition: Condition, present: bool) -> Self {
        if present {
            self.conditions.insert(condition);
        } else {
            self.conditions.remove(&condition);
        }
        self
    }

    pub fn with_esa_intolerance(self, esa_intolerance: bool) -> Self {
        Self {
            esa_intolerance,
            ..self
        }
    }

    pub fn with_esa_hyporesponsive(self, esa_hyporesponsive: bool) -> Self {
        Self {
            esa_hyporesponsive,
            ..self
        }
    }

    pub fn with_high_inflammatory_marker(self, high_inflammatory_marker: bool) -> Self {
        Self {
            high_inflammatory_marker,
            ..self
        }
    }

    pub fn with_refrigeration_access(self, refrigeration_access: bool) -> Self {
        Self {
            refrigeration_access,
            ..self
        }
    }

    pub fn with_route_preference(self, route_preference: Option<RoutePreference>) -> Self {
        Self {
            route_preference,
            ..self
        }
    }

    fn with_derived_saturation(self) -> Self {
        match derive_transferrin_saturation(self.serum_iron, self.total_iron_binding_capacity) {
            Some(tsat) => self.with_transferrin_saturation(Some(tsat)),
            None => self,
        }
    }
}

/// A single field edit, applied as a pure transform of a [`PatientRecord`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordEdit {
    Group(Option<Group>),
    Sex(Option<Sex>),
    Hemoglobin(Option<LabValue>),
    Ferritin(Option<LabValue>),
    TransferrinSaturation(Option<u32>),
    SerumIron(Option<LabValue>),
    TotalIronBindingCapacity(Option<LabValue>),
    ActiveInfection(bool),
    AllCausesExcluded(bool),
    Finding(Finding, bool),
    StrokeOrThrombosis(bool),
    Condition(Condition, bool),
    EsaIntolerance(bool),
    EsaHyporesponsive(bool),
    HighInflammatoryMarker(bool),
    RefrigerationAccess(bool),
    RoutePreference(Option<RoutePreference>),
}

impl RecordEdit {
    /// Produces the record with this edit applied.
    pub fn apply(self, record: PatientRecord) -> PatientRecord {
        match self {
            RecordEdit::Group(v) => record.with_group(v),
            RecordEdit::Sex(v) => record.with_sex(v),
            RecordEdit::Hemoglobin(v) => record.with_hemoglobin(v),
            RecordEdit::Ferritin(v) => record.with_ferritin(v),
            RecordEdit::TransferrinSaturation(v) => record.with_transferrin_saturation(v),
            RecordEdit::SerumIron(v) => record.with_serum_iron(v),
            RecordEdit::TotalIronBindingCapacity(v) => record.with_total_iron_binding_capacity(v),
            RecordEdit::ActiveInfection(v) => record.with_active_infection(v),
            RecordEdit::AllCausesExcluded(v) => record.with_all_causes_excluded(v),
            RecordEdit::Finding(finding, v) => record.with_finding(finding, v),
            RecordEdit::StrokeOrThrombosis(v) => record.with_stroke_or_thrombosis(v),
            RecordEdit::Condition(condition, v) => record.with_condition(condition, v),
            RecordEdit::EsaIntolerance(v) => record.with_esa_intolerance(v),
            RecordEdit::EsaHyporesponsive(v) => record.with_esa_hyporesponsive(v),
            RecordEdit::HighInflammatoryMarker(v) => record.with_high_inflammatory_marker(v),
            RecordEdit::RefrigerationAccess(v) => record.with_refrigeration_access(v),
            RecordEdit::RoutePreference(v) => record.with_route_preference(v),
        }
    }

    /// Name of the edited field, for logging.
    pub fn field(&self) -> &'static str {
        match self {
            RecordEdit::Group(_) => "group",
            RecordEdit::Sex(_) => "sex",
            RecordEdit::Hemoglobin(_) => "hemoglobin",
            RecordEdit::Ferritin(_) => "ferritin",
            RecordEdit::TransferrinSaturation(_) => "transferrin_saturation",
            RecordEdit::SerumIron(_) => "serum_iron",
            RecordEdit::TotalIronBindingCapacity(_) => "total_iron_binding_capacity",
            RecordEdit::ActiveInfection(_) => "has_active_infection",
            RecordEdit::AllCausesExcluded(_) => "all_causes_excluded",
            RecordEdit::Finding(..) => "finding",
            RecordEdit::StrokeOrThrombosis(_) => "current_stroke_or_thrombosis",
            RecordEdit::Condition(..) => "condition",
            RecordEdit::EsaIntolerance(_) => "esa_intolerance",
            RecordEdit::EsaHyporesponsive(_) => "esa_hyporesponsive",
            RecordEdit::HighInflammatoryMarker(_) => "high_inflammatory_marker",
            RecordEdit::RefrigerationAccess(_) => "refrigeration_access",
            RecordEdit::RoutePreference(_) => "route_preference",
        }
    }
}
