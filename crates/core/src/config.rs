//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the stage sequencer. Evaluators never read process-wide environment variables,
//! which keeps every evaluation a pure function of the patient record.

use crate::{AnemiaError, AnemiaResult};
use std::str::FromStr;

/// How the sequencer's forward gate treats an `ActionRequired` result.
///
/// `ActionRequired` is produced when iron therapy should be started and when the differential
/// workup has not been recorded yet. Only `Stop` blocks under the default
/// [`ActionRequiredPolicy::Advisory`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionRequiredPolicy {
    /// `ActionRequired` is informational; the clinician may advance.
    #[default]
    Advisory,
    /// `ActionRequired` blocks advancing until the record changes.
    Blocking,
}

impl ActionRequiredPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionRequiredPolicy::Advisory => "advisory",
            ActionRequiredPolicy::Blocking => "blocking",
        }
    }
}

impl FromStr for ActionRequiredPolicy {
    type Err = AnemiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(ActionRequiredPolicy::Advisory),
            "blocking" => Ok(ActionRequiredPolicy::Blocking),
            other => Err(AnemiaError::UnknownPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for ActionRequiredPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreConfig {
    action_required_policy: ActionRequiredPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(action_required_policy: ActionRequiredPolicy) -> Self {
        Self {
            action_required_policy,
        }
    }

    pub fn action_required_policy(&self) -> ActionRequiredPolicy {
        self.action_required_policy
    }
}

/// Parse the action-required policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default (advisory) policy.
pub fn action_required_policy_from_env_value(
    value: Option<String>,
) -> AnemiaResult<ActionRequiredPolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<ActionRequiredPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}
