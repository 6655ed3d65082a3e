//! In-memory identity provider for demos and offline runs.

use std::collections::HashMap;
use std::time::Duration;

use adevo_core::{Bvn, IdentityRecord, LinkedAccount};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::lookup::{IdentityLookup, LookupError};

pub const NOT_FOUND_MESSAGE: &str =
    "Invalid BVN or user not found. Please check the number and try again.";

const DEMO_BVN: &str = "12345678901";

/// The record the demo provider returns for `12345678901`.
pub fn demo_record() -> IdentityRecord {
    IdentityRecord {
        first_name: "CHINEDU".into(),
        middle_name: "ADEBAYO".into(),
        last_name: "OKORO".into(),
        phone_number: "08012345678".into(),
        date_of_birth: "15-Aug-1992".into(),
        bvn: Bvn::parse(DEMO_BVN).expect("demo BVN is well-formed"),
        linked_accounts: vec![
            LinkedAccount::new("GTBank", "0123456789"),
            LinkedAccount::new("Kuda Bank", "2001234567"),
            LinkedAccount::new("First Bank", "3098765432"),
            LinkedAccount::new("Access Bank", "0078901234"),
        ],
    }
}

/// Serves identity records from a fixed table, optionally after a delay.
#[derive(Debug, Clone, Default)]
pub struct FixtureLookup {
    records: HashMap<Bvn, IdentityRecord>,
    latency: Duration,
}

impl FixtureLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that knows the demo record only.
    pub fn demo() -> Self {
        Self::new().with_record(demo_record())
    }

    pub fn with_record(mut self, record: IdentityRecord) -> Self {
        self.records.insert(record.bvn.clone(), record);
        self
    }

    /// Simulate network latency before each answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl IdentityLookup for FixtureLookup {
    async fn lookup(&self, bvn: &Bvn) -> Result<IdentityRecord, LookupError> {
        info!(bvn = %bvn.masked(), "fixture identity lookup");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.records.get(bvn) {
            Some(record) => Ok(record.clone()),
            None => {
                warn!(bvn = %bvn.masked(), "no fixture record");
                Err(LookupError::Rejected(NOT_FOUND_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_knows_demo_bvn() {
        let provider = FixtureLookup::demo();
        let record = provider
            .lookup(&Bvn::parse("12345678901").unwrap())
            .await
            .unwrap();
        assert_eq!(record.first_name, "CHINEDU");
        assert_eq!(record.linked_accounts.len(), 4);
    }

    #[tokio::test]
    async fn unknown_bvn_is_rejected_with_user_message() {
        let provider = FixtureLookup::demo();
        let err = provider
            .lookup(&Bvn::parse("00000000000").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn latency_is_applied() {
        let provider = FixtureLookup::demo().with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();
        provider
            .lookup(&Bvn::parse("12345678901").unwrap())
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn custom_records() {
        let mut record = demo_record();
        record.bvn = Bvn::parse("22222222222").unwrap();
        record.linked_accounts.truncate(1);
        let provider = FixtureLookup::new().with_record(record);

        let found = provider
            .lookup(&Bvn::parse("22222222222").unwrap())
            .await
            .unwrap();
        assert_eq!(found.linked_accounts.len(), 1);
        assert!(
            provider
                .lookup(&Bvn::parse("12345678901").unwrap())
                .await
                .is_err()
        );
    }
}
