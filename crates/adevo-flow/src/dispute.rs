//! Dispute filing: form, letter generation, review, submission.
//!
//! ```text
//! Form --submit--> Generating --ok--> Review --confirm--> Submitted
//!  ^                   |               |
//!  |                   +--err--> Error |
//!  +----retry----------------------+   |
//!  +----go_back------------------------+
//! ```
//!
//! Generation cannot be cancelled once started. Details survive `go_back`
//! and `retry`; only the generated letter is discarded.

use std::mem;
use std::sync::Arc;

use adevo_ai::{GenerationError, LetterGenerator};
use adevo_core::{BankName, DisputeDetails, DisputeStatus, IdentityRecord, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::FlowError;
use crate::token::{CallToken, Resolution, TokenSource};

/// A confirmed dispute, ready to hand to a delivery channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSubmission {
    pub details: DisputeDetails,
    pub letter: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisputeState {
    Form {
        draft: DisputeDetails,
        validation: Option<ValidationError>,
    },
    Generating {
        details: DisputeDetails,
        token: CallToken,
    },
    Review {
        details: DisputeDetails,
        letter: String,
    },
    Submitted(DisputeSubmission),
    Error {
        details: DisputeDetails,
        message: String,
    },
}

impl DisputeState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Form { .. } => "form",
            Self::Generating { .. } => "generating",
            Self::Review { .. } => "review",
            Self::Submitted(_) => "submitted",
            Self::Error { .. } => "error",
        }
    }
}

/// A letter generation the machine is waiting on.
#[derive(Debug, Clone)]
pub struct LetterTicket {
    token: CallToken,
    identity: Arc<IdentityRecord>,
    details: DisputeDetails,
}

impl LetterTicket {
    pub fn token(&self) -> CallToken {
        self.token
    }

    pub fn details(&self) -> &DisputeDetails {
        &self.details
    }

    /// Draft the letter this ticket was issued for.
    pub async fn run(&self, generator: &dyn LetterGenerator) -> Result<String, GenerationError> {
        generator.generate(&self.identity, &self.details).await
    }
}

#[derive(Debug)]
pub struct DisputeMachine {
    identity: Arc<IdentityRecord>,
    state: DisputeState,
    tokens: TokenSource,
}

impl DisputeMachine {
    /// Open a blank dispute form for a verified user. The bank defaults to
    /// the user's first linked account.
    pub fn new(identity: Arc<IdentityRecord>) -> Self {
        let bank = identity
            .linked_accounts
            .first()
            .map(|account| BankName::parse(&account.bank_name))
            .unwrap_or_default();
        Self {
            identity,
            state: DisputeState::Form {
                draft: DisputeDetails::for_bank(bank),
                validation: None,
            },
            tokens: TokenSource::default(),
        }
    }

    pub fn identity(&self) -> &Arc<IdentityRecord> {
        &self.identity
    }

    pub fn state(&self) -> &DisputeState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, DisputeState::Generating { .. })
    }

    /// Banks offered on the form: each linked-account bank once, in order,
    /// followed by "Other".
    pub fn bank_options(&self) -> Vec<BankName> {
        let mut options: Vec<BankName> = Vec::new();
        for account in &self.identity.linked_accounts {
            let bank = BankName::parse(&account.bank_name);
            if !options.contains(&bank) {
                options.push(bank);
            }
        }
        options.push(BankName::default());
        options
    }

    /// The details currently held, whatever the state.
    pub fn details(&self) -> &DisputeDetails {
        match &self.state {
            DisputeState::Form { draft, .. } => draft,
            DisputeState::Generating { details, .. }
            | DisputeState::Review { details, .. }
            | DisputeState::Error { details, .. } => details,
            DisputeState::Submitted(submission) => &submission.details,
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match &self.state {
            DisputeState::Form { validation, .. } => validation.as_ref(),
            _ => None,
        }
    }

    pub fn letter(&self) -> Option<&str> {
        match &self.state {
            DisputeState::Review { letter, .. } => Some(letter),
            DisputeState::Submitted(submission) => Some(&submission.letter),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            DisputeState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn submission(&self) -> Option<&DisputeSubmission> {
        match &self.state {
            DisputeState::Submitted(submission) => Some(submission),
            _ => None,
        }
    }

    /// Edit the draft in place. Only available on the form.
    pub fn draft_mut(&mut self) -> Result<&mut DisputeDetails, FlowError> {
        match &mut self.state {
            DisputeState::Form { draft, .. } => Ok(draft),
            other => Err(FlowError::invalid("edit the dispute form", other.name())),
        }
    }

    /// Edit the generated letter. Only available in review.
    pub fn letter_mut(&mut self) -> Result<&mut String, FlowError> {
        match &mut self.state {
            DisputeState::Review { letter, .. } => Ok(letter),
            other => Err(FlowError::invalid("edit the letter", other.name())),
        }
    }

    /// Validate `details` and start drafting the letter.
    ///
    /// Invalid details stay on the form as the draft, with the validation
    /// message attached, and no ticket is issued.
    pub fn submit(&mut self, details: DisputeDetails) -> Result<LetterTicket, FlowError> {
        match self.state {
            DisputeState::Form { .. } => {}
            ref other => return Err(FlowError::invalid("submit a dispute", other.name())),
        }

        if let Err(err) = details.validate() {
            info!(reason = %err, "dispute form rejected locally");
            self.state = DisputeState::Form {
                draft: details,
                validation: Some(err.clone()),
            };
            return Err(FlowError::Validation(err));
        }

        let token = self.tokens.issue();
        info!(
            reference = %details.transaction_id,
            bank = %details.bank,
            token = token.value(),
            "generating dispute letter"
        );
        self.state = DisputeState::Generating {
            details: details.clone(),
            token,
        };
        Ok(LetterTicket {
            token,
            identity: Arc::clone(&self.identity),
            details,
        })
    }

    /// Submit whatever is on the form.
    pub fn submit_draft(&mut self) -> Result<LetterTicket, FlowError> {
        let draft = self.draft_mut()?.clone();
        self.submit(draft)
    }

    /// Apply the outcome of the generation issued under `token`.
    pub fn resolve(
        &mut self,
        token: CallToken,
        outcome: Result<String, GenerationError>,
    ) -> Resolution {
        let details = match &mut self.state {
            DisputeState::Generating {
                details,
                token: pending,
            } if *pending == token => mem::take(details),
            other => {
                warn!(token = token.value(), state = other.name(), "discarding stale letter");
                return Resolution::Stale;
            }
        };

        self.state = match outcome {
            Ok(letter) => {
                info!(reference = %details.transaction_id, chars = letter.len(), "letter ready for review");
                DisputeState::Review { details, letter }
            }
            Err(err) => {
                let message = err.to_string();
                warn!(reference = %details.transaction_id, error = %message, "letter generation failed");
                DisputeState::Error { details, message }
            }
        };
        Resolution::Applied
    }

    /// Leave review for the form, dropping the letter but keeping details.
    pub fn go_back(&mut self) -> Result<(), FlowError> {
        match &mut self.state {
            DisputeState::Review { details, .. } => {
                let draft = mem::take(details);
                self.state = DisputeState::Form {
                    draft,
                    validation: None,
                };
                Ok(())
            }
            other => Err(FlowError::invalid("go back", other.name())),
        }
    }

    /// Return to the form after a failed generation, keeping details.
    pub fn retry(&mut self) -> Result<(), FlowError> {
        match &mut self.state {
            DisputeState::Error { details, .. } => {
                let draft = mem::take(details);
                self.state = DisputeState::Form {
                    draft,
                    validation: None,
                };
                Ok(())
            }
            other => Err(FlowError::invalid("retry", other.name())),
        }
    }

    /// Accept the (possibly edited) letter. The dispute becomes `Pending`
    /// and read-only; the returned submission is the hand-off for delivery.
    pub fn confirm(&mut self) -> Result<DisputeSubmission, FlowError> {
        let (mut details, letter) = match &mut self.state {
            DisputeState::Review { details, letter } => (mem::take(details), mem::take(letter)),
            other => return Err(FlowError::invalid("confirm", other.name())),
        };
        details.status = Some(DisputeStatus::Pending);
        info!(reference = %details.transaction_id, bank = %details.bank, "dispute submitted");
        let submission = DisputeSubmission {
            details,
            letter,
            submitted_at: Utc::now(),
        };
        self.state = DisputeState::Submitted(submission.clone());
        Ok(submission)
    }

    /// Submit `details`, await the generator, and apply the result.
    pub async fn generate(
        &mut self,
        details: DisputeDetails,
        generator: &dyn LetterGenerator,
    ) -> Result<Resolution, FlowError> {
        let ticket = self.submit(details)?;
        let outcome = ticket.run(generator).await;
        Ok(self.resolve(ticket.token(), outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedDrafter, dispute_details, identity_with};
    use adevo_core::KnownBank;
    use rust_decimal_macros::dec;

    fn machine() -> DisputeMachine {
        DisputeMachine::new(Arc::new(identity_with(4)))
    }

    async fn in_review() -> DisputeMachine {
        let mut m = machine();
        m.generate(dispute_details(), &ScriptedDrafter::drafting())
            .await
            .unwrap();
        m
    }

    #[test]
    fn opens_on_form_with_first_linked_bank() {
        let m = machine();
        assert_eq!(m.state().name(), "form");
        assert_eq!(m.details().bank, BankName::Known(KnownBank::GtBank));
    }

    #[test]
    fn no_linked_accounts_defaults_to_other() {
        let m = DisputeMachine::new(Arc::new(identity_with(0)));
        assert_eq!(m.details().bank, BankName::default());
    }

    #[test]
    fn bank_options_are_distinct_then_other() {
        let m = DisputeMachine::new(Arc::new(identity_with(5)));
        let names: Vec<String> = m.bank_options().iter().map(|b| b.to_string()).collect();
        assert_eq!(
            names,
            ["GTBank", "Kuda Bank", "First Bank", "Access Bank", "Other"]
        );
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_generator() {
        let drafter = ScriptedDrafter::drafting();
        let mut m = machine();

        let mut details = dispute_details();
        details.amount = dec!(0);
        let err = m.generate(details.clone(), &drafter).await.unwrap_err();

        assert_eq!(err, FlowError::Validation(ValidationError::NonPositiveAmount));
        assert_eq!(m.validation(), Some(&ValidationError::NonPositiveAmount));
        assert_eq!(m.details(), &details);
        assert_eq!(drafter.calls(), 0);
    }

    #[tokio::test]
    async fn letter_lands_in_review_with_amount_and_reference() {
        let drafter = ScriptedDrafter::drafting();
        let mut m = machine();

        let ticket = m.submit(dispute_details()).unwrap();
        assert!(m.is_generating());
        let outcome = ticket.run(&drafter).await;
        assert_eq!(m.resolve(ticket.token(), outcome), Resolution::Applied);

        let letter = m.letter().unwrap();
        assert!(letter.contains("5,000"));
        assert!(letter.contains("FT24122XK9Q"));
        assert_eq!(drafter.calls(), 1);
    }

    #[tokio::test]
    async fn generation_failure_then_retry_keeps_details() {
        let drafter = ScriptedDrafter::failing("The letter service is unavailable.");
        let mut m = machine();
        m.generate(dispute_details(), &drafter).await.unwrap();

        assert_eq!(m.error_message(), Some("The letter service is unavailable."));
        m.retry().unwrap();
        assert_eq!(m.state().name(), "form");
        assert_eq!(m.details(), &dispute_details());
    }

    #[test]
    fn submit_while_generating_is_rejected() {
        let mut m = machine();
        m.submit(dispute_details()).unwrap();
        assert_eq!(
            m.submit(dispute_details()).unwrap_err(),
            FlowError::InvalidTransition {
                action: "submit a dispute",
                state: "generating"
            }
        );
        assert!(m.draft_mut().is_err());
    }

    #[test]
    fn stale_letter_is_discarded() {
        let mut m = machine();
        let ticket = m.submit(dispute_details()).unwrap();
        m.resolve(ticket.token(), Ok("first".into()));

        assert_eq!(
            m.resolve(ticket.token(), Ok("second".into())),
            Resolution::Stale
        );
        assert_eq!(m.letter(), Some("first"));
    }

    #[tokio::test]
    async fn letter_is_editable_in_review() {
        let mut m = in_review().await;
        m.letter_mut().unwrap().push_str("\n\nP.S. Please call me.");
        assert!(m.letter().unwrap().ends_with("P.S. Please call me."));
    }

    #[tokio::test]
    async fn go_back_drops_letter_keeps_details() {
        let mut m = in_review().await;
        m.go_back().unwrap();
        assert_eq!(m.state().name(), "form");
        assert!(m.letter().is_none());
        assert_eq!(m.details(), &dispute_details());
    }

    #[tokio::test]
    async fn edited_draft_can_be_resubmitted() {
        let mut m = in_review().await;
        m.go_back().unwrap();
        m.draft_mut().unwrap().amount = dec!(7500);

        let ticket = m.submit_draft().unwrap();
        assert_eq!(ticket.details().amount, dec!(7500));
    }

    #[tokio::test]
    async fn confirm_sets_pending_and_keeps_edits() {
        let mut m = in_review().await;
        m.letter_mut().unwrap().push_str("\nEdited.");

        let submission = m.confirm().unwrap();
        assert_eq!(submission.details.status, Some(DisputeStatus::Pending));
        assert!(submission.letter.ends_with("Edited."));
        assert_eq!(m.state().name(), "submitted");
    }

    #[tokio::test]
    async fn confirm_always_assigns_pending() {
        let mut m = machine();
        let mut details = dispute_details();
        details.status = Some(DisputeStatus::Resolved);
        m.generate(details, &ScriptedDrafter::drafting())
            .await
            .unwrap();

        let submission = m.confirm().unwrap();
        assert_eq!(submission.details.status, Some(DisputeStatus::Pending));
    }

    #[tokio::test]
    async fn submitted_dispute_is_read_only() {
        let mut m = in_review().await;
        m.confirm().unwrap();

        assert!(m.draft_mut().is_err());
        assert!(m.letter_mut().is_err());
        assert!(m.go_back().is_err());
        assert!(m.confirm().is_err());
        assert!(m.submit(dispute_details()).is_err());
    }

    #[test]
    fn confirm_outside_review_is_rejected() {
        let mut m = machine();
        assert!(matches!(
            m.confirm(),
            Err(FlowError::InvalidTransition { action: "confirm", state: "form" })
        ));
    }

    #[tokio::test]
    async fn submission_serialises_for_hand_off() {
        let mut m = in_review().await;
        let submission = m.confirm().unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["details"]["status"], "Pending");
        assert_eq!(json["details"]["transactionId"], "FT24122XK9Q");
        assert!(json["submittedAt"].is_string());
    }
}
