//! Clinical thresholds used by the stage evaluators.
//!
//! These values are fixed by the guideline and are not configurable at runtime.

/// Hemoglobin below which a male patient is anaemic (g/dL, strict `<`).
pub const MALE_ANEMIA_HB: f64 = 13.0;

/// Hemoglobin below which a female patient is anaemic (g/dL, strict `<`).
pub const FEMALE_ANEMIA_HB: f64 = 12.0;

/// Ferritin below which severe iron deficiency is assumed (ng/mL, strict `<`).
pub const SEVERE_DEFICIENCY_FERRITIN: f64 = 45.0;

/// Ferritin above which iron must not be started (ng/mL, strict `>`).
pub const IRON_OVERLOAD_FERRITIN: f64 = 700.0;

/// TSAT at or above which iron must not be started (%).
pub const IRON_OVERLOAD_TSAT: u32 = 40;

/// Haemodialysis start criteria: ferritin `<=` and TSAT `<=`.
pub const HD_START_FERRITIN: f64 = 500.0;
pub const HD_START_TSAT: u32 = 30;

/// Non-HD start criteria, low-ferritin band: ferritin `<` and TSAT `<`.
pub const NON_HD_LOW_FERRITIN: f64 = 100.0;
pub const NON_HD_LOW_BAND_TSAT: u32 = 40;

/// Non-HD start criteria, mid-ferritin band upper bound (inclusive) and TSAT `<`.
pub const NON_HD_MID_FERRITIN: f64 = 300.0;
pub const NON_HD_MID_BAND_TSAT: u32 = 25;

/// Hemoglobin above which no anemia treatment agent is started (g/dL, strict `>`).
pub const AGENT_INITIATION_HB: f64 = 10.0;

/// Upper hemoglobin target that must not be maintained on ESA therapy (g/dL).
pub const AGENT_UPPER_TARGET_HB: f64 = 11.5;

/// Environment variable naming the action-required gate policy.
pub const ACTION_REQUIRED_POLICY_ENV: &str = "ANEMIA_ACTION_REQUIRED_POLICY";
