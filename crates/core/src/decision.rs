//! Decision result returned by every stage evaluator.

use serde::{Deserialize, Serialize};

/// Drives the sequencer's progression gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Continue,
    Stop,
    ActionRequired,
}

/// Display hint only; never read by decision logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Urgent,
    Treatment,
    Info,
}

/// A recommendation produced fresh by one evaluator call.
///
/// `details` is ordered: it mirrors the order in which rules qualified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub status: DecisionStatus,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl DecisionResult {
    pub fn new(
        status: DecisionStatus,
        category: Category,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title: title.into(),
            message: message.into(),
            details: Vec::new(),
            category: Some(category),
        }
    }

    /// `Continue` with no clinical content: required inputs have not been entered yet.
    pub fn awaiting_input() -> Self {
        Self {
            status: DecisionStatus::Continue,
            title: String::new(),
            message: String::new(),
            details: Vec::new(),
            category: None,
        }
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    /// True for the "awaiting input" result.
    pub fn is_awaiting_input(&self) -> bool {
        self.category.is_none() && self.title.is_empty() && self.message.is_empty()
    }
}
