//! The four ordered stages of the pathway.

use crate::{AnemiaError, AnemiaResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Screening = 1,
    IronTherapy = 2,
    Workup = 3,
    TreatmentAgent = 4,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Screening,
        Stage::IronTherapy,
        Stage::Workup,
        Stage::TreatmentAgent,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Parse a 1-based stage number.
    pub fn from_number(number: u8) -> AnemiaResult<Self> {
        match number {
            1 => Ok(Stage::Screening),
            2 => Ok(Stage::IronTherapy),
            3 => Ok(Stage::Workup),
            4 => Ok(Stage::TreatmentAgent),
            other => Err(AnemiaError::InvalidStage(other)),
        }
    }

    /// The following stage, or `None` at the terminal stage.
    pub fn next(self) -> Option<Self> {
        match self {
            Stage::Screening => Some(Stage::IronTherapy),
            Stage::IronTherapy => Some(Stage::Workup),
            Stage::Workup => Some(Stage::TreatmentAgent),
            Stage::TreatmentAgent => None,
        }
    }

    /// The preceding stage, or `None` at the first stage.
    pub fn previous(self) -> Option<Self> {
        match self {
            Stage::Screening => None,
            Stage::IronTherapy => Some(Stage::Screening),
            Stage::Workup => Some(Stage::IronTherapy),
            Stage::TreatmentAgent => Some(Stage::Workup),
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Screening => "Basic data",
            Stage::IronTherapy => "Iron indices",
            Stage::Workup => "Differential diagnosis",
            Stage::TreatmentAgent => "Treatment selection",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

/// Accepts either the stage number (`"2"`) or its snake_case name (`"iron_therapy"`).
impl FromStr for Stage {
    type Err = AnemiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<u8>() {
            return Stage::from_number(number);
        }
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "screening" => Ok(Stage::Screening),
            "iron_therapy" | "iron" => Ok(Stage::IronTherapy),
            "workup" => Ok(Stage::Workup),
            "treatment_agent" | "treatment" => Ok(Stage::TreatmentAgent),
            _ => Err(AnemiaError::UnknownStage(s.to_string())),
        }
    }
}
