//! Onboarding: consent, BVN entry, lookup, dashboard.
//!
//! ```text
//! Consent --agree--> Input --submit--> Loading --ok--> Dashboard
//!                      ^                  |               |
//!                      |                  +--err--> Error |
//!                      +------------reset-----------------+
//! ```
//!
//! `Error` shows the input surface with the failure attached, so both
//! `submit` (new identifier) and `retry` (same identifier) leave it.

use std::sync::Arc;

use adevo_core::{Bvn, IdentityRecord, ScoreResult, ValidationError, compute_score};
use adevo_kyc::{IdentityLookup, LookupError};
use tracing::{info, warn};

use crate::error::FlowError;
use crate::token::{CallToken, Resolution, TokenSource};

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingState {
    Consent,
    Input {
        validation: Option<ValidationError>,
    },
    Loading {
        bvn: Bvn,
        token: CallToken,
    },
    Dashboard {
        record: Arc<IdentityRecord>,
        score: ScoreResult,
    },
    Error {
        bvn: Bvn,
        message: String,
    },
}

impl OnboardingState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Consent => "consent",
            Self::Input { .. } => "input",
            Self::Loading { .. } => "loading",
            Self::Dashboard { .. } => "dashboard",
            Self::Error { .. } => "error",
        }
    }
}

/// An identity lookup the machine is waiting on.
#[derive(Debug, Clone)]
pub struct LookupTicket {
    token: CallToken,
    bvn: Bvn,
}

impl LookupTicket {
    pub fn token(&self) -> CallToken {
        self.token
    }

    pub fn bvn(&self) -> &Bvn {
        &self.bvn
    }

    /// Perform the lookup this ticket was issued for.
    pub async fn run(&self, provider: &dyn IdentityLookup) -> Result<IdentityRecord, LookupError> {
        provider.lookup(&self.bvn).await
    }
}

#[derive(Debug)]
pub struct OnboardingMachine {
    state: OnboardingState,
    tokens: TokenSource,
}

impl Default for OnboardingMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingMachine {
    /// Fresh session, starting at the consent gate.
    pub fn new() -> Self {
        Self {
            state: OnboardingState::Consent,
            tokens: TokenSource::default(),
        }
    }

    /// Re-enter with a record already verified this session (e.g. returning
    /// from a dispute). Starts directly at the dashboard.
    pub fn resume(record: Arc<IdentityRecord>) -> Self {
        let mut machine = Self::new();
        machine.enter_dashboard(record);
        machine
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn record(&self) -> Option<&Arc<IdentityRecord>> {
        match &self.state {
            OnboardingState::Dashboard { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<&ScoreResult> {
        match &self.state {
            OnboardingState::Dashboard { score, .. } => Some(score),
            _ => None,
        }
    }

    /// Failure message from the last lookup, if the machine is in `Error`.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            OnboardingState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match &self.state {
            OnboardingState::Input { validation } => validation.as_ref(),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, OnboardingState::Loading { .. })
    }

    pub fn agree(&mut self) -> Result<(), FlowError> {
        match self.state {
            OnboardingState::Consent => {
                info!("consent given");
                self.state = OnboardingState::Input { validation: None };
                Ok(())
            }
            ref other => Err(FlowError::invalid("agree", other.name())),
        }
    }

    /// Validate `raw` and start a lookup for it.
    ///
    /// A malformed identifier leaves the machine at `Input` with the
    /// validation message and issues no ticket.
    pub fn submit(&mut self, raw: &str) -> Result<LookupTicket, FlowError> {
        match self.state {
            OnboardingState::Input { .. } | OnboardingState::Error { .. } => {}
            ref other => return Err(FlowError::invalid("submit", other.name())),
        }
        match Bvn::parse(raw) {
            Ok(bvn) => Ok(self.start_lookup(bvn)),
            Err(err) => {
                info!(reason = %err, "identifier rejected locally");
                self.state = OnboardingState::Input {
                    validation: Some(err.clone()),
                };
                Err(FlowError::Validation(err))
            }
        }
    }

    /// Resubmit the identifier whose lookup failed.
    pub fn retry(&mut self) -> Result<LookupTicket, FlowError> {
        match &self.state {
            OnboardingState::Error { bvn, .. } => {
                let bvn = bvn.clone();
                Ok(self.start_lookup(bvn))
            }
            other => Err(FlowError::invalid("retry", other.name())),
        }
    }

    fn start_lookup(&mut self, bvn: Bvn) -> LookupTicket {
        let token = self.tokens.issue();
        info!(bvn = %bvn.masked(), token = token.value(), "looking up BVN");
        self.state = OnboardingState::Loading {
            bvn: bvn.clone(),
            token,
        };
        LookupTicket { token, bvn }
    }

    /// Apply the outcome of the lookup issued under `token`.
    pub fn resolve(
        &mut self,
        token: CallToken,
        outcome: Result<IdentityRecord, LookupError>,
    ) -> Resolution {
        let bvn = match &self.state {
            OnboardingState::Loading { bvn, token: pending } if *pending == token => bvn.clone(),
            other => {
                warn!(token = token.value(), state = other.name(), "discarding stale lookup result");
                return Resolution::Stale;
            }
        };

        match outcome {
            Ok(record) => self.enter_dashboard(Arc::new(record)),
            Err(err) => {
                let message = err.to_string();
                warn!(bvn = %bvn.masked(), error = %message, "BVN lookup failed");
                self.state = OnboardingState::Error { bvn, message };
            }
        }
        Resolution::Applied
    }

    fn enter_dashboard(&mut self, record: Arc<IdentityRecord>) {
        let score = compute_score(&record);
        info!(
            accounts = record.linked_accounts.len(),
            overall = score.overall_score,
            "identity verified"
        );
        self.state = OnboardingState::Dashboard { record, score };
    }

    /// Discard the current record, error, or pending lookup and return to
    /// BVN entry. Consent is not asked again.
    pub fn reset(&mut self) -> Result<(), FlowError> {
        match self.state {
            OnboardingState::Dashboard { .. }
            | OnboardingState::Error { .. }
            | OnboardingState::Loading { .. } => {
                info!(from = self.state.name(), "onboarding reset");
                self.state = OnboardingState::Input { validation: None };
                Ok(())
            }
            ref other => Err(FlowError::invalid("reset", other.name())),
        }
    }

    /// Submit `raw`, await the provider, and apply the result.
    pub async fn lookup(
        &mut self,
        raw: &str,
        provider: &dyn IdentityLookup,
    ) -> Result<Resolution, FlowError> {
        let ticket = self.submit(raw)?;
        let outcome = ticket.run(provider).await;
        Ok(self.resolve(ticket.token(), outcome))
    }

    /// Retry the failed identifier, await the provider, and apply the result.
    pub async fn retry_lookup(
        &mut self,
        provider: &dyn IdentityLookup,
    ) -> Result<Resolution, FlowError> {
        let ticket = self.retry()?;
        let outcome = ticket.run(provider).await;
        Ok(self.resolve(ticket.token(), outcome))
    }
}
