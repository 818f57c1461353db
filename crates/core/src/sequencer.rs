//! Stage sequencer.
//!
//! The sequencer owns the session's [`PatientRecord`] and the active [`Stage`]. Every edit and
//! every stage change re-runs the active evaluator before returning, so [`StageSequencer::result`]
//! always reflects the current record; a stale result can never be observed.
//!
//! Transitions are synchronous and never depend on wall-clock time. A UI that wants a delay
//! before an automatic advance applies it on its side.

use crate::config::{ActionRequiredPolicy, CoreConfig};
use crate::decision::{DecisionResult, DecisionStatus};
use crate::evaluators::evaluate_stage;
use crate::record::{PatientRecord, RecordEdit};
use crate::stage::Stage;

#[derive(Clone, Debug)]
pub struct StageSequencer {
    cfg: CoreConfig,
    record: PatientRecord,
    stage: Stage,
    result: DecisionResult,
}

impl StageSequencer {
    /// Starts a session at screening with an empty record.
    pub fn new(cfg: CoreConfig) -> Self {
        Self::with_record(cfg, PatientRecord::default())
    }

    /// Starts a session at screening with an already collected record.
    pub fn with_record(cfg: CoreConfig, record: PatientRecord) -> Self {
        let result = evaluate_stage(Stage::Screening, &record);
        Self {
            cfg,
            record,
            stage: Stage::Screening,
            result,
        }
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The active evaluator's result for the current record.
    pub fn result(&self) -> &DecisionResult {
        &self.result
    }

    /// Applies one field edit and re-evaluates.
    ///
    /// Ticking "all causes excluded" while at the workup stage advances once, immediately,
    /// after re-evaluation. Returns `true` when that automatic advance happened.
    pub fn edit(&mut self, edit: RecordEdit) -> bool {
        let auto_advance =
            self.stage == Stage::Workup && matches!(edit, RecordEdit::AllCausesExcluded(true));
        let field = edit.field();

        let record = std::mem::take(&mut self.record);
        self.record = edit.apply(record);
        self.refresh();
        tracing::debug!(field, stage = %self.stage, status = ?self.result.status, "record edited");

        if auto_advance {
            let advanced = self.advance();
            if advanced {
                tracing::debug!("all causes excluded; advanced automatically");
            }
            return advanced;
        }
        false
    }

    /// Replaces the whole record and re-evaluates. Never advances on its own.
    pub fn replace_record(&mut self, record: PatientRecord) {
        self.record = record;
        self.refresh();
    }

    /// True when the inputs the active stage needs before moving on are present.
    pub fn required_inputs_present(&self) -> bool {
        let record = &self.record;
        match self.stage {
            Stage::Screening => {
                record.hemoglobin().is_some() && record.sex().is_some() && record.group().is_some()
            }
            Stage::IronTherapy => {
                record.ferritin().is_some()
                    && record.transferrin_saturation().is_some()
                    && record.group().is_some()
            }
            Stage::Workup => record.workup().has_selection(),
            Stage::TreatmentAgent => record.hemoglobin().is_some(),
        }
    }

    /// The forward gate.
    ///
    /// Blocks on `Stop`, on `ActionRequired` when the policy is
    /// [`ActionRequiredPolicy::Blocking`], on missing inputs, and always at the terminal stage.
    pub fn can_advance(&self) -> bool {
        if self.stage.is_terminal() {
            return false;
        }
        let blocked = match self.result.status {
            DecisionStatus::Stop => true,
            DecisionStatus::ActionRequired => {
                self.cfg.action_required_policy() == ActionRequiredPolicy::Blocking
            }
            DecisionStatus::Continue => false,
        };
        !blocked && self.required_inputs_present()
    }

    /// Moves forward one stage if the gate allows it. Returns whether the stage changed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            tracing::debug!(stage = %self.stage, "advance blocked");
            return false;
        }
        match self.stage.next() {
            Some(next) => {
                self.move_to(next);
                true
            }
            None => false,
        }
    }

    /// Moves back one stage, clamped at screening. Returns whether the stage changed.
    pub fn retreat(&mut self) -> bool {
        match self.stage.previous() {
            Some(previous) => {
                self.move_to(previous);
                true
            }
            None => false,
        }
    }

    /// Jumps directly to `stage` (review navigation). Always permitted.
    pub fn go_to(&mut self, stage: Stage) {
        self.move_to(stage);
    }

    fn move_to(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "stage changed");
        self.stage = stage;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.result = evaluate_stage(self.stage, &self.record);
    }
}
