//! Verified identity data returned by the BVN provider.
//!
//! An [`IdentityRecord`] is immutable once created: a new lookup replaces it
//! wholesale. Account numbers are stored raw and redacted at every display
//! boundary via [`mask_account_number`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const BVN_LEN: usize = 11;
const VISIBLE_TAIL: usize = 4;
const MASK: &str = "******";

/// Bank Verification Number: exactly 11 ASCII digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bvn(String);

impl Bvn {
    /// Validate a raw identifier. Surrounding whitespace is not tolerated.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.len() == BVN_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidBvn)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Redacted form for logs: "*******8901".
    pub fn masked(&self) -> String {
        let tail = &self.0[BVN_LEN - VISIBLE_TAIL..];
        format!("{}{}", "*".repeat(BVN_LEN - VISIBLE_TAIL), tail)
    }
}

impl TryFrom<String> for Bvn {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Bvn> for String {
    fn from(value: Bvn) -> Self {
        value.0
    }
}

impl fmt::Debug for Bvn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bvn").field(&self.masked()).finish()
    }
}

impl fmt::Display for Bvn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Redact an account number for display.
///
/// Numbers of four characters or fewer are fully hidden. Longer numbers keep
/// their last four characters behind a fixed-width mask, so the rendered
/// value does not leak the original length.
pub fn mask_account_number(account_number: &str) -> String {
    let chars: Vec<char> = account_number.chars().collect();
    if chars.len() <= VISIBLE_TAIL {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - VISIBLE_TAIL..].iter().collect();
    format!("{MASK}{tail}")
}

/// One bank account linked to a BVN.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub bank_name: String,
    /// Raw, unmasked. Use [`LinkedAccount::masked_number`] for display.
    pub account_number: String,
}

impl LinkedAccount {
    pub fn new(bank_name: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            bank_name: bank_name.into(),
            account_number: account_number.into(),
        }
    }

    pub fn masked_number(&self) -> String {
        mask_account_number(&self.account_number)
    }
}

impl fmt::Debug for LinkedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedAccount")
            .field("bank_name", &self.bank_name)
            .field("account_number", &self.masked_number())
            .finish()
    }
}

impl fmt::Display for LinkedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.bank_name, self.masked_number())
    }
}

/// Verified personal and linked-account data for one BVN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub bvn: Bvn,
    #[serde(default)]
    pub linked_accounts: Vec<LinkedAccount>,
}

impl IdentityRecord {
    /// First, middle and last name; blank parts are skipped.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First and last name, as used to sign correspondence.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn account_count(&self) -> usize {
        self.linked_accounts.len()
    }
}
