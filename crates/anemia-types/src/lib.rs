/// Errors that can occur when creating validated laboratory values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LabValueError {
    /// The input was below zero
    #[error("value cannot be negative (got {0})")]
    Negative(f64),
    /// The input was NaN or infinite
    #[error("value must be a finite number")]
    NotFinite,
}

/// A laboratory measurement that is guaranteed to be finite and non-negative.
///
/// Absence of a measurement is modelled with `Option<LabValue>` by callers; a `LabValue` always
/// holds an entered number, so zero means "measured as zero" and never "not yet entered".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LabValue(f64);

impl LabValue {
    /// Creates a new `LabValue` from the given number.
    ///
    /// # Arguments
    ///
    /// * `value` - The measured value, in whatever unit the field is defined in
    ///
    /// # Returns
    ///
    /// Returns `Ok(LabValue)` if the number is finite and `>= 0`,
    /// or a [`LabValueError`] describing why it was rejected.
    pub fn new(value: f64) -> Result<Self, LabValueError> {
        if !value.is_finite() {
            return Err(LabValueError::NotFinite);
        }
        if value < 0.0 {
            return Err(LabValueError::Negative(value));
        }
        // Normalise -0.0 so displayed values never carry a sign.
        Ok(Self(value + 0.0))
    }

    /// Returns the inner number.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for LabValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for LabValue {
    type Error = LabValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LabValue> for f64 {
    fn from(value: LabValue) -> Self {
        value.0
    }
}

impl serde::Serialize for LabValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for LabValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        LabValue::new(value).map_err(serde::de::Error::custom)
    }
}
