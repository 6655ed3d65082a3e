//! Prompt templates for LLM-drafted complaint letters.

use adevo_core::{DisputeDetails, IdentityRecord, format_amount};

/// Regulatory sentence every letter must carry.
pub const CBN_GUIDELINE_SENTENCE: &str = "In line with the Central Bank of Nigeria (CBN) 'Guidelines on Resolution of Failed E-Channels Transactions', I expect a full reversal of the debited amount into my account within the regulatory timeframe of 24 hours (T+1).";

pub const SYSTEM_PROMPT: &str = "\
You are Adevo, a professional, calm, and assertive financial advocate representing a Nigerian bank customer.

Write a formal complaint email to a bank about a failed funds transfer: the funds were debited from \
the customer's account but never received by the beneficiary.

The letter must contain, in order:
1. A subject line of the form \"Subject: Formal Complaint: Unresolved Failed Transfer - Ref: <reference>\".
2. A formal salutation addressed to the bank's customer support team.
3. An introduction naming the customer and the failed transaction.
4. A body restating the sequence of events (initiated, debited, not received) and ALL transaction \
details exactly as given: bank, amount, date, reference, and the customer's description.
5. This sentence, verbatim: \"In line with the Central Bank of Nigeria (CBN) 'Guidelines on Resolution \
of Failed E-Channels Transactions', I expect a full reversal of the debited amount into my account \
within the regulatory timeframe of 24 hours (T+1).\"
6. A call to action requesting a prompt investigation and immediate reversal of the amount.
7. A sentence stating that evidence of the transaction is attached or available.
8. A professional closing followed by the customer's full name and phone number.

Keep the tone polite, formal, and firm. Avoid emotional or aggressive language.
Respond with the letter text only. No markdown, no commentary.";

/// The amount as it appears in letters: "NGN 5,000".
pub fn naira(details: &DisputeDetails) -> String {
    format!("NGN {}", format_amount(details.amount))
}

/// The transaction date as it appears in letters (ISO 8601).
pub fn transaction_date(details: &DisputeDetails) -> String {
    details
        .transaction_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "an unrecorded date".to_string())
}

/// What the letter should say about attached evidence.
pub fn evidence_note(details: &DisputeDetails) -> String {
    match &details.evidence {
        Some(evidence) => format!(
            "attached: {} (e.g., a debit alert screenshot or receipt)",
            evidence.file_name
        ),
        None => "none attached; state that a debit alert or receipt can be provided on request"
            .to_string(),
    }
}

/// Build the per-dispute user prompt.
pub fn build_user_prompt(identity: &IdentityRecord, details: &DisputeDetails) -> String {
    format!(
        "Customer name: {name}\n\
         Registered phone number: {phone}\n\
         \n\
         Bank: {bank}\n\
         Transaction reference: {reference}\n\
         Amount: {amount}\n\
         Date of transaction: {date}\n\
         Customer's description of the issue:\n\
         {description}\n\
         \n\
         Evidence: {evidence}",
        name = identity.display_name(),
        phone = identity.phone_number,
        bank = details.bank,
        reference = details.transaction_id,
        amount = naira(details),
        date = transaction_date(details),
        description = details.description,
        evidence = evidence_note(details),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use adevo_core::{BankName, Bvn, Evidence, KnownBank};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn identity() -> IdentityRecord {
        IdentityRecord {
            first_name: "CHINEDU".into(),
            middle_name: "ADEBAYO".into(),
            last_name: "OKORO".into(),
            phone_number: "08012345678".into(),
            date_of_birth: "15-Aug-1992".into(),
            bvn: Bvn::parse("12345678901").unwrap(),
            linked_accounts: Vec::new(),
        }
    }

    fn details() -> DisputeDetails {
        DisputeDetails {
            transaction_id: "TRX-0042".into(),
            amount: dec!(12500.5),
            bank: BankName::Known(KnownBank::AccessBank),
            transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            description: "Sent to my sister, she never got it.".into(),
            evidence: None,
            status: None,
        }
    }

    #[test]
    fn user_prompt_carries_every_field() {
        let prompt = build_user_prompt(&identity(), &details());
        for needle in [
            "CHINEDU OKORO",
            "08012345678",
            "Access Bank",
            "TRX-0042",
            "NGN 12,500.5",
            "2024-05-01",
            "Sent to my sister, she never got it.",
        ] {
            assert!(prompt.contains(needle), "missing {needle:?} in:\n{prompt}");
        }
    }

    #[test]
    fn evidence_note_names_attachment() {
        let mut with_file = details();
        with_file.evidence = Some(Evidence {
            file_name: "debit-alert.png".into(),
            size_bytes: 48_213,
            media_type: Some("image/png".into()),
        });
        assert!(evidence_note(&with_file).contains("debit-alert.png"));
        assert!(evidence_note(&details()).contains("on request"));
    }

    #[test]
    fn system_prompt_quotes_guideline_verbatim() {
        let flattened = SYSTEM_PROMPT.replace('\n', " ");
        assert!(flattened.contains("Guidelines on Resolution of Failed E-Channels Transactions"));
        assert!(flattened.contains("24 hours (T+1)"));
    }
}
