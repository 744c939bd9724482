//! Host platform seam
//!
//! The widget never talks to a keyboard or an alert dialog directly; it asks
//! the host through [`HostPlatform`]. [`RecordingHost`] keeps every request so
//! tests and the demo binary can assert on them.

use serde::{Deserialize, Serialize};

/// User-visible terminal message for one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Failure,
}

impl Notification {
    pub fn success(code: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            message: format!("Code {code} verified"),
        }
    }

    pub fn failure(reason: &str) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: "Verification failed".to_string(),
            message: reason.to_string(),
        }
    }
}

/// Services the widget consumes from the platform it is embedded in
pub trait HostPlatform {
    /// Give keyboard focus to the hidden field (shows the keypad)
    fn focus_input(&mut self);

    /// Hide the on-screen keyboard
    fn dismiss_keyboard(&mut self);

    /// Show a terminal notification to the user
    fn notify(&mut self, notification: Notification);
}

/// One recorded call into the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    FocusInput,
    DismissKeyboard,
    Notify(Notification),
}

/// Host that records requests instead of acting on them
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    keyboard_visible: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Whether the keyboard would currently be on screen
    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    /// Notifications shown so far, oldest first
    pub fn notifications(&self) -> Vec<&Notification> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Notify(notification) => Some(notification),
                _ => None,
            })
            .collect()
    }

    pub fn focus_requests(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::FocusInput))
            .count()
    }
}

impl HostPlatform for RecordingHost {
    fn focus_input(&mut self) {
        self.keyboard_visible = true;
        self.calls.push(HostCall::FocusInput);
    }

    fn dismiss_keyboard(&mut self) {
        self.keyboard_visible = false;
        self.calls.push(HostCall::DismissKeyboard);
    }

    fn notify(&mut self, notification: Notification) {
        self.calls.push(HostCall::Notify(notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_host_tracks_keyboard() {
        let mut host = RecordingHost::new();
        assert!(!host.keyboard_visible());

        host.focus_input();
        assert!(host.keyboard_visible());
        host.dismiss_keyboard();
        assert!(!host.keyboard_visible());

        assert_eq!(
            host.calls(),
            &[HostCall::FocusInput, HostCall::DismissKeyboard]
        );
        assert_eq!(host.focus_requests(), 1);
    }

    #[test]
    fn notifications_are_filtered() {
        let mut host = RecordingHost::new();
        host.focus_input();
        host.notify(Notification::success("123456"));
        host.notify(Notification::failure("expired"));

        let shown = host.notifications();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].kind, NotificationKind::Success);
        assert_eq!(shown[0].message, "Code 123456 verified");
        assert_eq!(shown[1].kind, NotificationKind::Failure);
        assert_eq!(shown[1].message, "expired");
    }
}
