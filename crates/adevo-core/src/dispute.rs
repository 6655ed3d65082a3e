//! Dispute details captured from the user and their lifecycle status.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Banks the dispute form offers by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownBank {
    GtBank,
    KudaBank,
    FirstBank,
    AccessBank,
}

impl KnownBank {
    pub const ALL: [KnownBank; 4] = [
        KnownBank::GtBank,
        KnownBank::KudaBank,
        KnownBank::FirstBank,
        KnownBank::AccessBank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GtBank => "GTBank",
            Self::KudaBank => "Kuda Bank",
            Self::FirstBank => "First Bank",
            Self::AccessBank => "Access Bank",
        }
    }

    /// Case-insensitive match on the display name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|bank| bank.as_str().eq_ignore_ascii_case(name))
    }
}

/// Bank a dispute is addressed to: a known bank or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BankName {
    Known(KnownBank),
    /// Free-text bank name. Empty means the user picked "Other" without
    /// naming one.
    Other(String),
}

impl BankName {
    pub fn parse(name: &str) -> Self {
        if let Some(bank) = KnownBank::from_name(name) {
            return Self::Known(bank);
        }
        let name = name.trim();
        if name.eq_ignore_ascii_case("other") {
            Self::Other(String::new())
        } else {
            Self::Other(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(bank) => bank.as_str(),
            Self::Other(name) if name.is_empty() => "Other",
            Self::Other(name) => name,
        }
    }
}

impl Default for BankName {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for BankName {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<BankName> for String {
    fn from(value: BankName) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a submitted dispute.
///
/// Only `Pending` is assigned locally; the others arrive from the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeStatus {
    Pending,
    #[serde(rename = "Awaiting Bank Response")]
    AwaitingBankResponse,
    Resolved,
    Rejected,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::AwaitingBankResponse => "Awaiting Bank Response",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to an evidence attachment (e.g. a debit-alert
/// screenshot). The contents are never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub file_name: String,
    pub size_bytes: u64,
    pub media_type: Option<String>,
}

/// A failed-transfer dispute as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeDetails {
    pub transaction_id: String,
    pub amount: Decimal,
    pub bank: BankName,
    pub transaction_date: Option<NaiveDate>,
    pub description: String,
    pub evidence: Option<Evidence>,
    pub status: Option<DisputeStatus>,
}

impl DisputeDetails {
    /// Blank form addressed to `bank`.
    pub fn for_bank(bank: BankName) -> Self {
        Self {
            bank,
            ..Self::default()
        }
    }

    /// Check required fields, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.transaction_id.trim().is_empty() {
            return Err(ValidationError::MissingTransactionId);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.transaction_date.is_none() {
            return Err(ValidationError::MissingTransactionDate);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        Ok(())
    }
}
