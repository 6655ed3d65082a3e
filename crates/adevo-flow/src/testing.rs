//! Scripted ports and fixtures shared by the flow tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use adevo_ai::{GenerationError, LetterGenerator, draft_letter};
use adevo_core::{BankName, Bvn, DisputeDetails, IdentityRecord, KnownBank, LinkedAccount};
use adevo_kyc::{IdentityLookup, LookupError};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

pub(crate) fn identity_with(accounts: usize) -> IdentityRecord {
    IdentityRecord {
        first_name: "CHINEDU".into(),
        middle_name: "ADEBAYO".into(),
        last_name: "OKORO".into(),
        phone_number: "08012345678".into(),
        date_of_birth: "15-Aug-1992".into(),
        bvn: Bvn::parse("12345678901").unwrap(),
        linked_accounts: ["GTBank", "Kuda Bank", "First Bank", "Access Bank", "GTBank"]
            .iter()
            .cycle()
            .take(accounts)
            .enumerate()
            .map(|(i, bank)| LinkedAccount::new(*bank, format!("30{i:08}")))
            .collect(),
    }
}

pub(crate) fn dispute_details() -> DisputeDetails {
    DisputeDetails {
        transaction_id: "FT24122XK9Q".into(),
        amount: dec!(5000),
        bank: BankName::Known(KnownBank::GtBank),
        transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        description: "Transfer to my landlord was debited but never arrived.".into(),
        evidence: None,
        status: None,
    }
}

/// Identity provider that always gives the same answer and counts calls.
pub(crate) struct ScriptedLookup {
    outcome: Result<IdentityRecord, String>,
    calls: AtomicUsize,
}

impl ScriptedLookup {
    pub(crate) fn found(record: IdentityRecord) -> Self {
        Self {
            outcome: Ok(record),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for ScriptedLookup {
    async fn lookup(&self, _bvn: &Bvn) -> Result<IdentityRecord, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(record) => Ok(record.clone()),
            Err(message) => Err(LookupError::Rejected(message.clone())),
        }
    }
}

/// Letter generator that drafts from the template or fails, counting calls.
pub(crate) struct ScriptedDrafter {
    failure: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedDrafter {
    pub(crate) fn drafting() -> Self {
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LetterGenerator for ScriptedDrafter {
    async fn generate(
        &self,
        identity: &IdentityRecord,
        details: &DisputeDetails,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(GenerationError::Rejected(message.clone())),
            None => Ok(draft_letter(identity, details)),
        }
    }
}
