//! Code verification seam
//!
//! Real network submission is out of scope; [`SimulatedVerifier`] stands in
//! for it. The delay lives in the controller's timer queue, so `verify` itself
//! answers immediately.

use std::collections::HashSet;

/// Why a code was not accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("code {code} was rejected")]
    Rejected { code: String },

    #[error("code must be {expected} digits, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// Checks a complete code
pub trait Verifier {
    fn verify(&mut self, code: &str) -> Result<(), VerifyError>;
}

/// Accepts every code except those on a reject list
#[derive(Debug, Clone, Default)]
pub struct SimulatedVerifier {
    rejected: HashSet<String>,
    attempts: Vec<String>,
}

impl SimulatedVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a verifier that refuses each code in `codes`
    pub fn rejecting<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rejected: codes.into_iter().map(Into::into).collect(),
            attempts: Vec::new(),
        }
    }

    /// Codes received so far, oldest first
    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }
}

impl Verifier for SimulatedVerifier {
    fn verify(&mut self, code: &str) -> Result<(), VerifyError> {
        self.attempts.push(code.to_string());

        let actual = code.chars().count();
        if actual != crate::domain::CODE_LENGTH {
            return Err(VerifyError::WrongLength {
                expected: crate::domain::CODE_LENGTH,
                actual,
            });
        }

        if self.rejected.contains(code) {
            return Err(VerifyError::Rejected {
                code: code.to_string(),
            });
        }

        Ok(())
    }
}
