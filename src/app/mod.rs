//! Application orchestration layer
//!
//! Coordinates the domain model with host services, verification, and time.

pub mod controller;
pub mod host;
pub mod state;
pub mod timers;
pub mod verifier;

pub use controller::{OtpController, OtpError, OtpSnapshot};
pub use host::{HostCall, HostPlatform, Notification, NotificationKind, RecordingHost};
pub use state::{Outcome, StateMachine, SubmissionEvent, SubmissionStatus};
pub use timers::{TimerHandle, TimerQueue, TimerTask};
pub use verifier::{SimulatedVerifier, Verifier, VerifyError};
