//! Top-level composition: which flow is on screen, and the identity record
//! shared between them.

use std::sync::Arc;

use adevo_core::IdentityRecord;
use tracing::info;

use crate::dispute::DisputeMachine;
use crate::error::FlowError;
use crate::onboarding::OnboardingMachine;

/// The single flow currently driving the session.
#[derive(Debug)]
pub enum ActiveFlow {
    Onboarding(OnboardingMachine),
    Dispute(DisputeMachine),
}

/// Owns the active flow. The verified identity travels with the active
/// machine: onboarding holds it on the dashboard, a dispute holds a shared
/// read-only handle to the same record.
#[derive(Debug)]
pub struct FlowCoordinator {
    active: ActiveFlow,
}

impl Default for FlowCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowCoordinator {
    pub fn new() -> Self {
        Self {
            active: ActiveFlow::Onboarding(OnboardingMachine::new()),
        }
    }

    /// Start with an identity verified earlier in the session; onboarding
    /// opens directly on the dashboard.
    pub fn with_identity(record: Arc<IdentityRecord>) -> Self {
        Self {
            active: ActiveFlow::Onboarding(OnboardingMachine::resume(record)),
        }
    }

    pub fn active(&self) -> &ActiveFlow {
        &self.active
    }

    pub fn identity(&self) -> Option<&Arc<IdentityRecord>> {
        match &self.active {
            ActiveFlow::Onboarding(machine) => machine.record(),
            ActiveFlow::Dispute(machine) => Some(machine.identity()),
        }
    }

    pub fn onboarding(&self) -> Option<&OnboardingMachine> {
        match &self.active {
            ActiveFlow::Onboarding(machine) => Some(machine),
            ActiveFlow::Dispute(_) => None,
        }
    }

    pub fn onboarding_mut(&mut self) -> Option<&mut OnboardingMachine> {
        match &mut self.active {
            ActiveFlow::Onboarding(machine) => Some(machine),
            ActiveFlow::Dispute(_) => None,
        }
    }

    pub fn dispute(&self) -> Option<&DisputeMachine> {
        match &self.active {
            ActiveFlow::Dispute(machine) => Some(machine),
            ActiveFlow::Onboarding(_) => None,
        }
    }

    pub fn dispute_mut(&mut self) -> Option<&mut DisputeMachine> {
        match &mut self.active {
            ActiveFlow::Dispute(machine) => Some(machine),
            ActiveFlow::Onboarding(_) => None,
        }
    }

    /// Hand control to a new dispute for the verified user.
    ///
    /// Requires onboarding to be on the dashboard; anything else is a
    /// caller error and leaves the coordinator unchanged.
    pub fn start_dispute(&mut self) -> Result<&mut DisputeMachine, FlowError> {
        let record = match &self.active {
            ActiveFlow::Onboarding(machine) => {
                machine.record().cloned().ok_or(FlowError::MissingIdentity)?
            }
            ActiveFlow::Dispute(_) => {
                return Err(FlowError::invalid("start a dispute", "disputing"));
            }
        };
        info!("dispute flow started");
        self.active = ActiveFlow::Dispute(DisputeMachine::new(record));
        self.dispute_mut().ok_or(FlowError::MissingIdentity)
    }

    /// Leave the dispute (cancel, or done) and return to the dashboard with
    /// the same record. Not allowed while a letter is being generated.
    pub fn exit_dispute(&mut self) -> Result<&mut OnboardingMachine, FlowError> {
        let record = match &self.active {
            ActiveFlow::Dispute(machine) if machine.is_generating() => {
                return Err(FlowError::invalid("leave the dispute", "generating"));
            }
            ActiveFlow::Dispute(machine) => {
                info!(state = machine.state().name(), "dispute flow exited");
                Arc::clone(machine.identity())
            }
            ActiveFlow::Onboarding(_) => {
                return Err(FlowError::invalid("leave the dispute", "onboarding"));
            }
        };
        self.active = ActiveFlow::Onboarding(OnboardingMachine::resume(record));
        self.onboarding_mut()
            .ok_or(FlowError::invalid("leave the dispute", "disputing"))
    }
}
