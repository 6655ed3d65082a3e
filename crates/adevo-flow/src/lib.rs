//! Step sequencing for the onboarding and dispute flows.
//!
//! Each flow is an explicit state machine. External calls are split into
//! a ticket (issued on submit) and a resolution (applied when the call
//! returns); a resolution only lands if the machine is still waiting on the
//! ticket's [`CallToken`].

mod coordinator;
mod dispute;
mod error;
mod onboarding;
mod token;

#[cfg(test)]
mod testing;

pub use coordinator::{ActiveFlow, FlowCoordinator};
pub use dispute::{DisputeMachine, DisputeState, DisputeSubmission, LetterTicket};
pub use error::FlowError;
pub use onboarding::{LookupTicket, OnboardingMachine, OnboardingState};
pub use token::{CallToken, Resolution};
