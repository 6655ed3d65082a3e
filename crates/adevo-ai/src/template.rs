//! Deterministic letter drafter used when no LLM is configured.

use std::time::Duration;

use adevo_core::{DisputeDetails, IdentityRecord};
use async_trait::async_trait;
use tracing::info;

use crate::generator::{GenerationError, LetterGenerator};
use crate::prompt::{CBN_GUIDELINE_SENTENCE, naira, transaction_date};

/// Render the standard complaint letter for a dispute.
pub fn draft_letter(identity: &IdentityRecord, details: &DisputeDetails) -> String {
    let name = identity.display_name();
    let amount = naira(details);
    let date = transaction_date(details);
    let reference = details.transaction_id.trim();

    let evidence = match &details.evidence {
        Some(evidence) => format!(
            "I have attached {} as evidence of the debit for your investigation.",
            evidence.file_name
        ),
        None => "Evidence of the transaction, such as the debit alert or receipt, is available and can be provided on request.".to_string(),
    };

    format!(
        "Subject: Formal Complaint: Unresolved Failed Transfer - Ref: {reference}\n\
         \n\
         Dear {bank} Customer Support Team,\n\
         \n\
         I am writing to file a formal complaint regarding a failed funds transfer initiated from my account with {bank}. My name is {name}.\n\
         \n\
         On {date}, I attempted a transaction with the reference ID {reference} for the amount of {amount}. The sum was successfully debited from my account; however, the intended beneficiary has confirmed that they never received the funds.\n\
         \n\
         In my own words: {description}\n\
         \n\
         As you are aware, this situation is time-sensitive and requires immediate attention. {guideline}\n\
         \n\
         {evidence}\n\
         \n\
         I request that you launch a prompt investigation into this matter and ensure the immediate reversal of {amount} back to my account.\n\
         \n\
         Thank you for your urgent attention to this issue.\n\
         \n\
         Sincerely,\n\
         \n\
         {name}\n\
         {phone}",
        bank = details.bank,
        description = details.description.trim(),
        guideline = CBN_GUIDELINE_SENTENCE,
        phone = identity.phone_number,
    )
}

/// [`LetterGenerator`] backed by [`draft_letter`].
#[derive(Debug, Clone, Default)]
pub struct TemplateDrafter {
    latency: Duration,
}

impl TemplateDrafter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate model latency before each draft.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl LetterGenerator for TemplateDrafter {
    async fn generate(
        &self,
        identity: &IdentityRecord,
        details: &DisputeDetails,
    ) -> Result<String, GenerationError> {
        info!(reference = %details.transaction_id, bank = %details.bank, "drafting letter from template");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(draft_letter(identity, details))
    }
}
