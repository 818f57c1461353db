//! Record document wire/boundary support.
//!
//! This crate provides **wire models** and **format/translation helpers** for patient records
//! and decision reports:
//! - YAML and JSON patient record documents (strict schema, path-aware errors)
//! - JSON/YAML rendering of evaluation reports
//! - Loading every record document in a directory
//!
//! It is the boundary that rejects invalid input (negative or non-finite numbers, fractional
//! TSAT, contradictory workup answers) before a [`anemia_core::PatientRecord`] exists. The core
//! crate assumes everything it receives has passed through here or an equivalent check.

pub mod loader;
pub mod record;
pub mod report;

pub use loader::{load_records_dir, LoadedRecord};
pub use record::{DocumentFormat, RecordDocument};
pub use report::{Report, RecordReport};

/// Errors returned by the `anemia-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Core(#[from] anemia_core::AnemiaError),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;
