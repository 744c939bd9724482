//! Submission state machine
//!
//! Two states only. Editing is allowed in `Idle`; `Submitting` covers the
//! whole span from the moment the code completes until the form resets,
//! including the short window where the result indicator is visible.

use serde::{Deserialize, Serialize};

/// Whether the widget is accepting input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Editable, waiting for a complete code
    #[default]
    Idle,
    /// Locked while the code is being verified
    Submitting,
}

impl SubmissionStatus {
    /// Returns true if edit and focus operations should be applied
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionStatus::Idle)
    }
}

/// Terminal result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Events that drive the submission state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// The last empty slot was just filled
    CodeCompleted,
    /// The submit button was pressed
    ManualSubmit,
    /// The verifier answered
    Resolved,
    /// The post-result display delay elapsed
    ResetElapsed,
}

/// Pure transition function for [`SubmissionStatus`]
pub struct StateMachine;

impl StateMachine {
    /// Processes an event and returns the new status
    ///
    /// Events that make no sense in the current state leave it unchanged;
    /// in particular a second completion while already submitting does not
    /// start another attempt.
    pub fn process_event(current: SubmissionStatus, event: SubmissionEvent) -> SubmissionStatus {
        match (current, event) {
            (SubmissionStatus::Idle, SubmissionEvent::CodeCompleted)
            | (SubmissionStatus::Idle, SubmissionEvent::ManualSubmit) => {
                SubmissionStatus::Submitting
            }

            // Still locked: the result is on screen until the reset fires
            (SubmissionStatus::Submitting, SubmissionEvent::Resolved) => {
                SubmissionStatus::Submitting
            }

            (SubmissionStatus::Submitting, SubmissionEvent::ResetElapsed) => SubmissionStatus::Idle,

            (state, _) => state,
        }
    }
}
