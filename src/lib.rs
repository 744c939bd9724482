//! # otp-entry
//!
//! Six-box one-time-passcode entry widget driven by a single hidden text
//! field.
//!
//! ## Modules
//!
//! - [`domain`] - code buffer, input sanitizing, selection model
//! - [`app`] - controller, submission state machine, virtual-time timers
//! - [`input`] - raw host events routed to controller operations
//! - [`ui`] - view tree with test identifiers, geometry, pixmap renderer
//! - [`config`] - TOML configuration

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod ui;

pub use app::{OtpController, OtpError, OtpSnapshot, RecordingHost, SimulatedVerifier};
pub use config::OtpConfig;
pub use domain::{CODE_LENGTH, CodeBuffer, Selection};
