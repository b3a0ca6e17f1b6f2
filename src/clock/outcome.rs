use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::ClockAction;

/// Result of one clock attempt. Every variant is terminal; business
/// rejections are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted(ClockAction),
    RejectedDebounce(ClockAction),
    RejectedAlreadyInState(ClockAction),
    RejectedNotFound,
    RejectedInvalidAction,
    RejectedInvalidInput,
    RejectedGateClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Accepted,
    RejectedDebounce,
    RejectedAlreadyInState,
    RejectedNotFound,
    RejectedInvalidAction,
    RejectedInvalidInput,
    RejectedGateClosed,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Accepted(_) => OutcomeKind::Accepted,
            Outcome::RejectedDebounce(_) => OutcomeKind::RejectedDebounce,
            Outcome::RejectedAlreadyInState(_) => OutcomeKind::RejectedAlreadyInState,
            Outcome::RejectedNotFound => OutcomeKind::RejectedNotFound,
            Outcome::RejectedInvalidAction => OutcomeKind::RejectedInvalidAction,
            Outcome::RejectedInvalidInput => OutcomeKind::RejectedInvalidInput,
            Outcome::RejectedGateClosed => OutcomeKind::RejectedGateClosed,
        }
    }

    /// Flash text shown after the redirect. `window` is the gate's
    /// human-readable opening hours.
    pub fn message(&self, name: &str, window: &str) -> String {
        use ClockAction::*;

        match self {
            Outcome::Accepted(ClockIn) => format!("{name} has clocked in."),
            Outcome::Accepted(ClockOut) => format!("{name} has clocked out."),
            Outcome::RejectedDebounce(ClockIn) => "Already clocked in recently.".to_string(),
            Outcome::RejectedDebounce(ClockOut) => "Already clocked out recently.".to_string(),
            Outcome::RejectedAlreadyInState(ClockIn) => "Already clocked in.".to_string(),
            Outcome::RejectedAlreadyInState(ClockOut) => "Already clocked out.".to_string(),
            Outcome::RejectedNotFound => "Employee not found.".to_string(),
            Outcome::RejectedInvalidAction => "Invalid action.".to_string(),
            Outcome::RejectedInvalidInput => "Name is required.".to_string(),
            Outcome::RejectedGateClosed => {
                format!("Clock in/out service is only available from {window}.")
            }
        }
    }
}
