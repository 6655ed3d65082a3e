//! Vertical card rendering for the dashboard, draft letters and submitted
//! disputes.
//!
//! Cards are built as strings so the interactive session can write them to
//! any sink. Account numbers only ever appear masked.

use adevo_core::{IdentityRecord, ScoreBand, ScoreResult, format_amount};
use adevo_flow::DisputeSubmission;

const LABEL_WIDTH: usize = 26;

/// Line-oriented card builder: a `=== title ===` header followed by
/// sections of labelled rows.
struct Card {
    out: String,
}

impl Card {
    fn new(title: &str) -> Self {
        Self {
            out: format!("=== {title} ===\n"),
        }
    }

    fn line(mut self, text: &str) -> Self {
        self.out.push_str(text);
        self.out.push('\n');
        self
    }

    fn section(mut self, header: &str) -> Self {
        self.out.push('\n');
        self.out.push_str(header);
        self.out.push('\n');
        self
    }

    fn row(mut self, label: &str, value: &str) -> Self {
        if value.is_empty() {
            return self;
        }
        self.out
            .push_str(&format!("  {label:<width$} {value}\n", width = LABEL_WIDTH));
        self
    }

    fn item(mut self, text: &str) -> Self {
        self.out.push_str(&format!("  {text}\n"));
        self
    }

    fn finish(self) -> String {
        self.out
    }
}

fn scored(score: u8) -> String {
    format!("{score} / 100 ({})", ScoreBand::of(score).as_str())
}

// ── Public API ──

/// The post-verification dashboard: score breakdown, recommendations,
/// personal details and masked linked accounts.
pub fn dashboard_card(record: &IdentityRecord, score: &ScoreResult) -> String {
    let mut card = Card::new(&record.full_name())
        .line(&format!("BVN {}", record.bvn.masked()))
        .section("Adevo Score")
        .row("overall", &scored(score.overall_score))
        .row("financial health", &scored(score.health_score))
        .row("account security", &scored(score.security_score))
        .section("Recommendations");
    for (i, recommendation) in score.recommendations.iter().enumerate() {
        card = card.item(&format!("{}. {recommendation}", i + 1));
    }

    card = card
        .section("Personal Details")
        .row("full name", &record.full_name())
        .row("phone number", &record.phone_number)
        .row("date of birth", &record.date_of_birth)
        .section(&format!("Linked Accounts ({})", record.account_count()));
    if record.linked_accounts.is_empty() {
        card = card.item("(none)");
    }
    for account in &record.linked_accounts {
        card = card.row(&account.bank_name, &account.masked_number());
    }
    card.finish()
}

/// A generated letter awaiting review.
pub fn letter_card(reference: &str, letter: &str) -> String {
    Card::new(&format!("Draft letter {reference}"))
        .line("")
        .line(letter)
        .finish()
}

/// Status card for a confirmed dispute.
pub fn status_card(submission: &DisputeSubmission) -> String {
    let details = &submission.details;
    let status = details
        .status
        .map(|s| s.as_str())
        .unwrap_or("Not submitted");
    let date = details
        .transaction_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let evidence = details
        .evidence
        .as_ref()
        .map(|e| format!("{} ({} bytes)", e.file_name, e.size_bytes))
        .unwrap_or_else(|| "none".to_string());

    Card::new(&format!("Dispute {}", details.transaction_id))
        .section("Status")
        .row("status", status)
        .row(
            "submitted",
            &submission.submitted_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
        .section("Transaction")
        .row("bank", details.bank.as_str())
        .row("amount", &format!("NGN {}", format_amount(details.amount)))
        .row("date", &date)
        .row("description", &details.description)
        .row("evidence", &evidence)
        .finish()
}
