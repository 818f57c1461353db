//! Walking a record through the pathway without a clinician at the controls.
//!
//! Used by batch callers: evaluate the active stage, keep the result, and advance for as long
//! as the gate allows.

use crate::advisory::{regulatory_advisory, Advisory};
use crate::decision::DecisionResult;
use crate::sequencer::StageSequencer;
use crate::stage::Stage;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathwayStep {
    pub stage: Stage,
    pub result: DecisionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathwayOutcome {
    pub steps: Vec<PathwayStep>,
    /// Stage the walk stopped at: the first blocking stage or the terminal stage.
    pub final_stage: Stage,
}

impl PathwayOutcome {
    /// The result of the stage the walk stopped at.
    pub fn final_result(&self) -> Option<&DecisionResult> {
        self.steps.last().map(|step| &step.result)
    }
}

/// Records the active stage's result, then advances while the gate allows.
pub fn walk_pathway(sequencer: &mut StageSequencer) -> PathwayOutcome {
    let mut steps = Vec::new();
    loop {
        let result = sequencer.result().clone();
        let advisory = regulatory_advisory(&result, sequencer.record().group());
        steps.push(PathwayStep {
            stage: sequencer.stage(),
            result,
            advisory,
        });
        if !sequencer.advance() {
            break;
        }
    }
    PathwayOutcome {
        steps,
        final_stage: sequencer.stage(),
    }
}
