//! Per-instance form state.

use std::fmt;

use cms_forms_core::error::ValidationErrors;

use crate::value::FormValues;

/// Where a form is in its submission lifecycle.
///
/// `Idle → Submitting → {Success, Error, RateLimited}`. A terminal phase
/// goes back through `Submitting` on the next valid submit; there is no
/// automatic retry or timed reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    /// Nothing sent yet, or the last attempt failed validation.
    #[default]
    Idle,
    /// A payload is with the submission collaborator.
    Submitting,
    /// The backend accepted the last payload.
    Success,
    /// The last submission failed.
    Error,
    /// The backend throttled the last submission.
    RateLimited,
}

impl SubmissionPhase {
    /// Returns `true` for the three outcomes of a finished submission.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::RateLimited)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Error => "error",
            Self::RateLimited => "rate-limited",
        };
        f.write_str(name)
    }
}

/// Values, errors and phase of one form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current values by effective key.
    pub values: FormValues,
    /// Current errors by effective key.
    pub errors: ValidationErrors,
    /// Submission lifecycle phase.
    pub phase: SubmissionPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = FormState::default();
        assert_eq!(state.phase, SubmissionPhase::Idle);
        assert!(state.values.is_empty());
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SubmissionPhase::RateLimited.to_string(), "rate-limited");
        assert!(SubmissionPhase::Error.is_terminal());
        assert!(!SubmissionPhase::Submitting.is_terminal());
    }
}
