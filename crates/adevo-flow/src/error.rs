use adevo_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Input rejected locally; the machine stays where it was.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Caller bug: a dispute needs a verified identity.
    #[error("no verified identity: complete onboarding before filing a dispute")]
    MissingIdentity,
}

impl FlowError {
    pub(crate) fn invalid(action: &'static str, state: &'static str) -> Self {
        Self::InvalidTransition { action, state }
    }
}
