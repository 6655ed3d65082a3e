//! Adevo score: financial health and account security derived from a BVN's
//! linked accounts.
//!
//! # Rules
//!
//! - Health is a step function of the linked-account count `n`:
//!   0 → 0, 1 → 40, 2–3 → 70, 4–5 → 90, 6+ → 100.
//! - Security starts at 100. A single account costs 20 points (single point
//!   of failure); more than seven costs 15 (dormant-account risk). Both rules
//!   are checked independently and deductions saturate at 0.
//! - A phone-number reminder is always the last recommendation.
//! - Overall is the mean of health and security, rounded half-up.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityRecord;

const SINGLE_ACCOUNT_PENALTY: u8 = 20;
const DORMANCY_PENALTY: u8 = 15;
const DORMANCY_THRESHOLD: usize = 7;

pub const SECOND_ACCOUNT_RECOMMENDATION: &str = "Consider opening a second account to avoid service disruption if your primary bank has issues.";
pub const DORMANCY_RECOMMENDATION: &str = "Review your accounts to ensure they are all active. Close any dormant accounts to reduce your financial footprint.";

/// Derived score breakdown. Never persisted; recompute from the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub overall_score: u8,
    pub health_score: u8,
    pub security_score: u8,
    /// Generation order; the phone-number reminder is always last.
    pub recommendations: Vec<String>,
}

/// Display band for a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            80.. => Self::Good,
            60..=79 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Health score for a linked-account count.
pub fn health_score(accounts: usize) -> u8 {
    match accounts {
        0 => 0,
        1 => 40,
        2..=3 => 70,
        4..=5 => 90,
        _ => 100,
    }
}

/// Mean of two scores, rounded half-up (70 and 85 give 78).
pub fn overall_score(health: u8, security: u8) -> u8 {
    let sum = u16::from(health) + u16::from(security);
    // Both inputs are at most 100, so the mean fits in u8.
    ((sum + 1) / 2) as u8
}

fn deduct(score: u8, penalty: u8) -> u8 {
    score.saturating_sub(penalty)
}

/// Compute the score breakdown for an identity record.
///
/// Pure and deterministic: the same record always yields an identical result.
pub fn compute_score(record: &IdentityRecord) -> ScoreResult {
    let n = record.account_count();
    let health = health_score(n);

    let mut security: u8 = 100;
    let mut recommendations = Vec::new();

    if n == 1 {
        security = deduct(security, SINGLE_ACCOUNT_PENALTY);
        recommendations.push(SECOND_ACCOUNT_RECOMMENDATION.to_string());
    }

    if n > DORMANCY_THRESHOLD {
        security = deduct(security, DORMANCY_PENALTY);
        recommendations.push(DORMANCY_RECOMMENDATION.to_string());
    }

    recommendations.push(format!(
        "Ensure your registered phone number ({}) is current with all your banks to receive security alerts.",
        record.phone_number
    ));

    let overall = overall_score(health, security);
    tracing::debug!(accounts = n, health, security, overall, "computed score");

    ScoreResult {
        overall_score: overall,
        health_score: health,
        security_score: security,
        recommendations,
    }
}
