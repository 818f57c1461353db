use anemia_types::LabValueError;

#[derive(Debug, thiserror::Error)]
pub enum AnemiaError {
    #[error("invalid {field}: {source}")]
    LabValue {
        field: &'static str,
        #[source]
        source: LabValueError,
    },
    #[error("invalid {field}: {value} is not a whole non-negative percentage")]
    InvalidPercentage { field: &'static str, value: f64 },
    #[error("invalid stage number {0} (expected 1-4)")]
    InvalidStage(u8),
    #[error("unknown stage name: {0}")]
    UnknownStage(String),
    #[error("unknown action-required policy: {0} (expected 'advisory' or 'blocking')")]
    UnknownPolicy(String),
}

pub type AnemiaResult<T> = std::result::Result<T, AnemiaError>;
