//! Boundary validation for numeric inputs.
//!
//! Callers (CLI, record documents, a UI) hand raw numbers to these helpers before building a
//! [`crate::PatientRecord`]. The evaluators assume every present value is already valid and
//! perform no further checks.

use crate::{AnemiaError, AnemiaResult};
use anemia_types::LabValue;

/// Validates a raw laboratory value for the named field.
///
/// # Errors
///
/// Returns `AnemiaError::LabValue` if the number is negative, NaN or infinite.
pub fn lab_value(field: &'static str, raw: f64) -> AnemiaResult<LabValue> {
    LabValue::new(raw).map_err(|source| AnemiaError::LabValue { field, source })
}

/// Validates an optional raw laboratory value, passing absence through unchanged.
pub fn optional_lab_value(field: &'static str, raw: Option<f64>) -> AnemiaResult<Option<LabValue>> {
    raw.map(|value| lab_value(field, value)).transpose()
}

/// Validates a raw transferrin saturation as a whole, non-negative percentage.
///
/// # Errors
///
/// Returns `AnemiaError::InvalidPercentage` if the number is negative, fractional, not finite,
/// or too large to be a percentage at all.
pub fn percentage(field: &'static str, raw: f64) -> AnemiaResult<u32> {
    if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 || raw > f64::from(u32::MAX) {
        return Err(AnemiaError::InvalidPercentage { field, value: raw });
    }
    Ok(raw as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anemia_types::LabValueError;

    #[test]
    fn lab_value_names_field_on_error() {
        let err = lab_value("ferritin", -1.0).expect_err("negative ferritin");
        match err {
            AnemiaError::LabValue { field, source } => {
                assert_eq!(field, "ferritin");
                assert_eq!(source, LabValueError::Negative(-1.0));
            }
            other => panic!("expected LabValue error, got {other:?}"),
        }
    }

    #[test]
    fn optional_lab_value_passes_absence_through() {
        assert_eq!(optional_lab_value("hemoglobin", None).expect("absent"), None);
        assert_eq!(
            optional_lab_value("hemoglobin", Some(9.0))
                .expect("present")
                .map(LabValue::get),
            Some(9.0)
        );
    }

    #[test]
    fn percentage_requires_whole_non_negative_numbers() {
        assert_eq!(percentage("transferrin_saturation", 30.0).expect("whole"), 30);
        assert!(percentage("transferrin_saturation", -5.0).is_err());
        assert!(percentage("transferrin_saturation", 22.5).is_err());
        assert!(percentage("transferrin_saturation", f64::NAN).is_err());
    }
}
