//! OTP entry controller
//!
//! Owns the code buffer, the selection, and the submission status, and is the
//! only place they change. Every public operation is a discrete UI event;
//! delays are driven through the virtual-time [`TimerQueue`].

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::host::{HostPlatform, Notification};
use crate::app::state::{Outcome, StateMachine, SubmissionEvent, SubmissionStatus};
use crate::app::timers::{TimerHandle, TimerQueue, TimerTask};
use crate::app::verifier::Verifier;
use crate::config::OtpConfig;
use crate::domain::code::{CODE_LENGTH, CodeBuffer, sanitize};
use crate::domain::selection::Selection;

/// Errors surfaced by controller operations
///
/// Edits that arrive while submitting are not errors: they are dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("box {index} does not exist (code has {} boxes)", CODE_LENGTH)]
    BoxOutOfRange { index: usize },

    #[error("submit is unavailable: {reason}")]
    SubmitUnavailable { reason: &'static str },
}

/// Serializable view of the widget state at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtpSnapshot {
    pub boxes: [String; CODE_LENGTH],
    pub value: String,
    pub selection: Selection,
    pub status: SubmissionStatus,
    pub outcome: Option<Outcome>,
    pub is_complete: bool,
    pub elapsed_ms: u128,
}

/// Main widget controller
pub struct OtpController<H: HostPlatform, V: Verifier> {
    config: OtpConfig,
    buffer: CodeBuffer,
    selection: Selection,
    status: SubmissionStatus,
    /// Result of the last attempt, shown until the form resets
    outcome: Option<Outcome>,
    timers: TimerQueue,
    pending_timer: Option<TimerHandle>,
    host: H,
    verifier: V,
}

impl<H: HostPlatform, V: Verifier> OtpController<H, V> {
    /// Creates a controller with an empty buffer and the caret on box 0
    pub fn new(config: OtpConfig, host: H, verifier: V) -> Self {
        Self {
            config,
            buffer: CodeBuffer::new(),
            selection: Selection::default(),
            status: SubmissionStatus::default(),
            outcome: None,
            timers: TimerQueue::new(),
            pending_timer: None,
            host,
            verifier,
        }
    }

    /// Mounts the widget: the hidden field takes focus right away
    pub fn mount(&mut self) {
        info!("OTP entry mounted");
        self.host.focus_input();
    }

    /// Unmounts the widget, cancelling every pending timer
    pub fn unmount(&mut self) {
        let tracked = self
            .pending_timer
            .take()
            .is_some_and(|handle| self.timers.cancel(handle));
        let swept = self.timers.cancel_all();
        if tracked || swept > 0 {
            debug!(tracked, swept, "cancelled pending timers on unmount");
        }
        info!("OTP entry unmounted");
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the host should next call [`OtpController::advance`], if ever
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Whether the manual submit button accepts presses
    ///
    /// Once the code is complete the automatic submission takes over, so the
    /// button is disabled then as well as while submitting.
    pub fn submit_enabled(&self) -> bool {
        self.status.is_editable() && !self.buffer.is_complete()
    }

    pub fn snapshot(&self) -> OtpSnapshot {
        OtpSnapshot {
            boxes: self.buffer.display(),
            value: self.buffer.value(),
            selection: self.selection,
            status: self.status,
            outcome: self.outcome.clone(),
            is_complete: self.buffer.is_complete(),
            elapsed_ms: self.timers.now().as_millis(),
        }
    }

    /// Text edit reported by the hidden field
    ///
    /// The text is reduced to one digit and written into the box under the
    /// selection start; the caret then moves to the next box. Text without a
    /// digit (including IME deletions) changes nothing.
    pub fn on_text_changed(&mut self, raw: &str) {
        if !self.status.is_editable() {
            debug!("text change ignored while submitting");
            return;
        }

        let Some(digit) = sanitize(raw) else {
            debug!(raw, "text change carried no digit");
            return;
        };

        let Some(slot) = self.selection.target_slot() else {
            debug!("caret is past the last box, digit dropped");
            return;
        };

        if let Err(err) = self.buffer.set(slot, digit) {
            warn!("digit write rejected: {err}");
            return;
        }
        self.selection = Selection::advanced_from(slot);
        debug!(slot, buffer = %self.buffer, "digit written");

        if self.buffer.is_complete() {
            self.begin_submission(SubmissionEvent::CodeCompleted);
        }
    }

    /// Backspace key on the hidden field
    ///
    /// Clears the box under the selection start. The caret stays where it is
    /// and later boxes keep their digits.
    pub fn on_backspace(&mut self) {
        if !self.status.is_editable() {
            debug!("backspace ignored while submitting");
            return;
        }

        let Some(slot) = self.selection.target_slot() else {
            return;
        };

        if let Err(err) = self.buffer.clear(slot) {
            warn!("slot clear rejected: {err}");
            return;
        }
        debug!(slot, buffer = %self.buffer, "slot cleared");
    }

    /// Native selection change reported by the hidden field
    pub fn on_selection_changed(&mut self, raw_start: i64, raw_end: i64) {
        if !self.status.is_editable() {
            return;
        }
        self.selection = Selection::clamped(raw_start, raw_end);
        debug!(
            start = self.selection.start(),
            end = self.selection.end(),
            "selection changed"
        );
    }

    /// Tap on box `index`
    ///
    /// A filled box is selected whole so the next digit overwrites it; an
    /// empty box gets a caret.
    pub fn focus_box(&mut self, index: usize) -> Result<(), OtpError> {
        if !self.status.is_editable() {
            return Ok(());
        }
        if index >= CODE_LENGTH {
            warn!(index, "tap on a box that does not exist");
            return Err(OtpError::BoxOutOfRange { index });
        }

        self.host.focus_input();
        self.selection = if self.buffer.is_filled(index) {
            Selection::overwrite(index)
        } else {
            Selection::caret(index)
        };
        debug!(index, "box focused");
        Ok(())
    }

    /// Tap on the row outside any box: focus without moving the caret
    pub fn focus_row(&mut self) {
        if !self.status.is_editable() {
            return;
        }
        self.host.focus_input();
    }

    /// Manual submit button
    ///
    /// Sends whatever has been entered so far. A partial code goes through the
    /// same verify, notify and reset cycle as a complete one; the verifier
    /// refuses it.
    pub fn press_submit(&mut self) -> Result<(), OtpError> {
        if !self.status.is_editable() {
            return Err(OtpError::SubmitUnavailable {
                reason: "a submission is already in progress",
            });
        }
        if !self.buffer.is_complete() {
            debug!(filled = self.buffer.filled_count(), "manual submit with a partial code");
        }
        self.begin_submission(SubmissionEvent::ManualSubmit);
        Ok(())
    }

    /// Advances virtual time, firing every timer that falls due
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now().saturating_add(by);
        while let Some(task) = self.timers.pop_due(until) {
            self.handle_timer(task);
        }
        self.timers.settle_at(until);
    }

    /// Fires pending timers one after another until none are left
    pub fn run_until_idle(&mut self) {
        while let Some(deadline) = self.timers.next_deadline() {
            let by = deadline.saturating_sub(self.timers.now());
            self.advance(by);
        }
    }

    fn begin_submission(&mut self, event: SubmissionEvent) {
        let next = StateMachine::process_event(self.status, event);
        if next == self.status {
            return;
        }
        self.status = next;
        info!(code_len = CODE_LENGTH, ?event, "submitting code");

        self.host.dismiss_keyboard();
        self.schedule(self.config.submit_delay(), TimerTask::ResolveSubmission);
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) {
        self.pending_timer = Some(self.timers.schedule(delay, task));
    }

    fn handle_timer(&mut self, task: TimerTask) {
        self.pending_timer = None;
        match task {
            TimerTask::ResolveSubmission => self.resolve_submission(),
            TimerTask::ResetForm => self.reset_form(),
            TimerTask::RestoreFocus => {
                debug!("restoring focus after reset");
                self.host.focus_input();
            }
        }
    }

    fn resolve_submission(&mut self) {
        let code = self.buffer.value();
        let (outcome, notification) = match self.verifier.verify(&code) {
            Ok(()) => {
                info!("code verified");
                (Outcome::Success, Notification::success(&code))
            }
            Err(err) => {
                warn!("code verification failed: {err}");
                let reason = err.to_string();
                let notification = Notification::failure(&reason);
                (Outcome::Failure { reason }, notification)
            }
        };

        self.status = StateMachine::process_event(self.status, SubmissionEvent::Resolved);
        self.outcome = Some(outcome);
        self.host.notify(notification);
        self.schedule(self.config.reset_delay(), TimerTask::ResetForm);
    }

    fn reset_form(&mut self) {
        self.buffer.reset();
        self.selection = Selection::default();
        self.outcome = None;
        self.status = StateMachine::process_event(self.status, SubmissionEvent::ResetElapsed);
        info!("form reset");
        self.schedule(self.config.refocus_delay(), TimerTask::RestoreFocus);
    }
}
