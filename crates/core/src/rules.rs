//! Precondition rules for workflow actions.
//!
//! Every entry point checks its action against a [`GateState`] built from
//! freshly-read project state, and the store re-checks the stage inside the
//! committing transaction. These functions are the single source of truth for
//! which action is legal when.

use serde::Serialize;

use crate::artifacts::Verdict;
use crate::error::CoreError;
use crate::questions::REQUIRED_ANSWER_COUNT;
use crate::stage::{Stage, WorkflowAction};

/// The slice of project state that decides which actions are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateState {
    pub stage: Stage,
    /// Verdict of the validation report, if one exists.
    pub verdict: Option<Verdict>,
    pub verdict_overridden: bool,
    pub answer_count: usize,
}

impl GateState {
    /// A fresh project that has not been validated yet.
    pub fn new_idea() -> Self {
        Self {
            stage: Stage::Idea,
            verdict: None,
            verdict_overridden: false,
            answer_count: 0,
        }
    }

    /// Whether the verdict allows the project to continue past validation.
    pub fn verdict_accepted(&self) -> bool {
        self.verdict == Some(Verdict::Build) || self.verdict_overridden
    }
}

/// Check whether `action` may run against `state`.
///
/// Returns [`CoreError::PreconditionViolation`] naming the required stage or
/// missing prerequisite and the action that is valid next.
pub fn check(action: WorkflowAction, state: &GateState) -> Result<(), CoreError> {
    let required = action.required_stage();
    if state.stage != required {
        return Err(violation(
            action,
            state,
            format!("this action requires stage '{required}'"),
        ));
    }

    match action {
        WorkflowAction::Validate
        | WorkflowAction::GenerateBrandKit
        | WorkflowAction::GenerateWebsite => Ok(()),
        WorkflowAction::OverrideVerdict => match state.verdict {
            None => Err(violation(
                action,
                state,
                "no validation report exists for this project".to_string(),
            )),
            Some(Verdict::Build) => Err(violation(
                action,
                state,
                "the verdict is already 'Build'; there is nothing to override".to_string(),
            )),
            Some(Verdict::Bounce) if state.verdict_overridden => Err(violation(
                action,
                state,
                "the verdict has already been overridden".to_string(),
            )),
            Some(Verdict::Bounce) => Ok(()),
        },
        WorkflowAction::RecordAnswer => require_accepted_verdict(action, state),
        WorkflowAction::SelectDomain => {
            require_accepted_verdict(action, state)?;
            if state.answer_count < REQUIRED_ANSWER_COUNT {
                return Err(violation(
                    action,
                    state,
                    format!(
                        "{} of {REQUIRED_ANSWER_COUNT} guided questions have been answered",
                        state.answer_count
                    ),
                ));
            }
            Ok(())
        }
    }
}

fn require_accepted_verdict(action: WorkflowAction, state: &GateState) -> Result<(), CoreError> {
    if state.verdict_accepted() {
        return Ok(());
    }
    let message = match state.verdict {
        None => "no validation report exists for this project".to_string(),
        Some(_) => "the verdict is 'Bounce'; override it before continuing".to_string(),
    };
    Err(violation(action, state, message))
}

fn violation(action: WorkflowAction, state: &GateState, message: String) -> CoreError {
    CoreError::PreconditionViolation {
        action,
        stage: state.stage,
        message,
        next_action: next_action(state),
    }
}

/// All actions that are legal right now.
pub fn legal_actions(state: &GateState) -> Vec<WorkflowAction> {
    WorkflowAction::ALL
        .into_iter()
        .filter(|action| check(*action, state).is_ok())
        .collect()
}

/// The action that moves the project forward from here, if any.
///
/// While answers are still missing, recording an answer is the way forward;
/// once enough are recorded, selecting a domain is.
pub fn next_action(state: &GateState) -> Option<WorkflowAction> {
    match state.stage {
        Stage::Idea => Some(WorkflowAction::Validate),
        Stage::Validated => {
            if !state.verdict_accepted() {
                (state.verdict == Some(Verdict::Bounce)).then_some(WorkflowAction::OverrideVerdict)
            } else if state.answer_count < REQUIRED_ANSWER_COUNT {
                Some(WorkflowAction::RecordAnswer)
            } else {
                Some(WorkflowAction::SelectDomain)
            }
        }
        Stage::DomainSelected => Some(WorkflowAction::GenerateBrandKit),
        Stage::BrandKitGenerated => Some(WorkflowAction::GenerateWebsite),
        Stage::WebsiteGenerated => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
