//! Interactive, line-driven session over the flow coordinator.
//!
//! Each turn renders the active machine's state and reads one command.
//! End of input quits.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use adevo_core::{BankName, DisputeDetails};
use adevo_flow::{
    ActiveFlow, DisputeMachine, DisputeState, FlowCoordinator, FlowError, OnboardingMachine,
    OnboardingState,
};
use anyhow::{Context, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::config::Providers;
use crate::display::{dashboard_card, letter_card, status_card};
use crate::evidence::load_evidence;

const CONSENT: &str = "\
Adevo looks up the bank accounts linked to your BVN to score your financial \
health and help you dispute failed transfers. Your BVN is only used for this \
session.";

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

pub struct Session<'a, R, W> {
    lines: Lines<R>,
    out: W,
    providers: &'a Providers,
    coordinator: FlowCoordinator,
}

impl<'a, R, W> Session<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W, providers: &'a Providers) -> Self {
        Self {
            lines: input.lines(),
            out,
            providers,
            coordinator: FlowCoordinator::new(),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let step = match self.coordinator.active() {
                ActiveFlow::Onboarding(_) => self.onboarding_turn().await?,
                ActiveFlow::Dispute(_) => self.dispute_turn().await?,
            };
            if step == Step::Quit {
                writeln!(self.out, "Goodbye.")?;
                return Ok(());
            }
        }
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    async fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    fn onboarding(&mut self) -> anyhow::Result<&mut OnboardingMachine> {
        self.coordinator
            .onboarding_mut()
            .context("onboarding is not active")
    }

    fn dispute(&mut self) -> anyhow::Result<&mut DisputeMachine> {
        self.coordinator
            .dispute_mut()
            .context("no dispute in progress")
    }

    // ── Onboarding ──

    async fn onboarding_turn(&mut self) -> anyhow::Result<Step> {
        let state = self.onboarding()?.state().clone();
        let providers = self.providers;
        let lookup = providers.lookup.as_ref();

        match state {
            OnboardingState::Consent => {
                writeln!(self.out, "{CONSENT}")?;
                match self.ask("Do you agree? [y/n]").await?.as_deref() {
                    Some("y" | "yes") => self.onboarding()?.agree()?,
                    Some("n" | "no" | "q") | None => return Ok(Step::Quit),
                    Some(_) => writeln!(self.out, "Please answer y or n.")?,
                }
            }
            OnboardingState::Input { validation } => {
                if let Some(err) = validation {
                    writeln!(self.out, "! {err}")?;
                }
                let Some(raw) = self.ask("Enter your 11-digit BVN (q to quit):").await? else {
                    return Ok(Step::Quit);
                };
                if raw == "q" {
                    return Ok(Step::Quit);
                }
                writeln!(self.out, "Verifying...")?;
                match self.onboarding()?.lookup(&raw, lookup).await {
                    Ok(_) | Err(FlowError::Validation(_)) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            OnboardingState::Loading { .. } => {
                self.onboarding()?.reset()?;
            }
            OnboardingState::Dashboard { record, score } => {
                writeln!(self.out, "{}", dashboard_card(&record, &score))?;
                match self
                    .ask("[d] dispute a failed transfer  [r] check another BVN  [q] quit")
                    .await?
                    .as_deref()
                {
                    Some("d") => {
                        self.coordinator.start_dispute()?;
                    }
                    Some("r") => self.onboarding()?.reset()?,
                    Some("q") | None => return Ok(Step::Quit),
                    Some(other) => writeln!(self.out, "Unknown choice '{other}'.")?,
                }
            }
            OnboardingState::Error { message, .. } => {
                writeln!(self.out, "! {message}")?;
                match self
                    .ask("[r] retry  [n] enter a different BVN  [q] quit")
                    .await?
                    .as_deref()
                {
                    Some("r") => {
                        writeln!(self.out, "Verifying...")?;
                        self.onboarding()?.retry_lookup(lookup).await?;
                    }
                    Some("n") => self.onboarding()?.reset()?,
                    Some("q") | None => return Ok(Step::Quit),
                    Some(other) => writeln!(self.out, "Unknown choice '{other}'.")?,
                }
            }
        }
        Ok(Step::Continue)
    }

    // ── Dispute ──

    async fn dispute_turn(&mut self) -> anyhow::Result<Step> {
        let state = self.dispute()?.state().clone();

        match state {
            DisputeState::Form { validation, .. } => {
                if let Some(err) = validation {
                    writeln!(self.out, "! {err}")?;
                }
                match self
                    .ask("[e] enter transaction details  [c] cancel")
                    .await?
                    .as_deref()
                {
                    Some("e") => {
                        if self.fill_form().await? == Step::Quit {
                            return Ok(Step::Quit);
                        }
                        self.draft_letter().await?;
                    }
                    Some("c") => {
                        self.coordinator.exit_dispute()?;
                    }
                    None => return Ok(Step::Quit),
                    Some(other) => writeln!(self.out, "Unknown choice '{other}'.")?,
                }
            }
            DisputeState::Generating { .. } => bail!("letter generation still in progress"),
            DisputeState::Review { details, letter } => {
                writeln!(self.out, "{}", letter_card(&details.transaction_id, &letter))?;
                match self
                    .ask("[c] confirm and submit  [e] edit letter  [b] back to form  [x] cancel")
                    .await?
                    .as_deref()
                {
                    Some("c") => {
                        self.dispute()?.confirm()?;
                    }
                    Some("e") => {
                        let Some(edited) = self.read_letter().await? else {
                            return Ok(Step::Quit);
                        };
                        *self.dispute()?.letter_mut()? = edited;
                    }
                    Some("b") => self.dispute()?.go_back()?,
                    Some("x") => {
                        self.coordinator.exit_dispute()?;
                    }
                    None => return Ok(Step::Quit),
                    Some(other) => writeln!(self.out, "Unknown choice '{other}'.")?,
                }
            }
            DisputeState::Submitted(submission) => {
                writeln!(self.out, "{}", status_card(&submission))?;
                match self
                    .ask("[d] back to dashboard  [q] quit")
                    .await?
                    .as_deref()
                {
                    Some("d") => {
                        self.coordinator.exit_dispute()?;
                    }
                    Some("q") | None => return Ok(Step::Quit),
                    Some(other) => writeln!(self.out, "Unknown choice '{other}'.")?,
                }
            }
            DisputeState::Error { message, .. } => {
                writeln!(self.out, "! Could not draft the letter: {message}")?;
                match self
                    .ask("[r] back to the form  [x] cancel")
                    .await?
                    .as_deref()
                {
                    Some("r") => self.dispute()?.retry()?,
                    Some("x") => {
                        self.coordinator.exit_dispute()?;
                    }
                    None => return Ok(Step::Quit),
                    Some(other) => writeln!(self.out, "Unknown choice '{other}'.")?,
                }
            }
        }
        Ok(Step::Continue)
    }

    /// Walk the form fields, writing the answers into the draft. Unparseable
    /// amounts and dates are left empty so validation reports them.
    async fn fill_form(&mut self) -> anyhow::Result<Step> {
        let machine = self.dispute()?;
        let options = machine.bank_options();
        let mut draft: DisputeDetails = machine.draft_mut()?.clone();

        let listing = options
            .iter()
            .enumerate()
            .map(|(i, bank)| format!("{}) {bank}", i + 1))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.out, "Banks: {listing}")?;
        let Some(answer) = self.ask(&format!("Bank [{}]:", draft.bank)).await? else {
            return Ok(Step::Quit);
        };
        if !answer.is_empty() {
            draft.bank = match answer.parse::<usize>() {
                Ok(i) if (1..=options.len()).contains(&i) => options[i - 1].clone(),
                _ => BankName::parse(&answer),
            };
        }
        if draft.bank == BankName::Other(String::new()) {
            let Some(name) = self.ask("Bank name:").await? else {
                return Ok(Step::Quit);
            };
            draft.bank = BankName::parse(&name);
        }

        let Some(reference) = self.ask("Transaction ID / reference:").await? else {
            return Ok(Step::Quit);
        };
        draft.transaction_id = reference;

        let Some(amount) = self.ask("Amount (NGN):").await? else {
            return Ok(Step::Quit);
        };
        draft.amount = Decimal::from_str(&amount.replace(',', "")).unwrap_or(Decimal::ZERO);

        let Some(date) = self.ask("Transaction date (YYYY-MM-DD):").await? else {
            return Ok(Step::Quit);
        };
        draft.transaction_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok();

        let Some(description) = self.ask("What happened?").await? else {
            return Ok(Step::Quit);
        };
        draft.description = description;

        let Some(path) = self.ask("Evidence file (blank for none):").await? else {
            return Ok(Step::Quit);
        };
        draft.evidence = if path.is_empty() {
            None
        } else {
            match load_evidence(Path::new(&path)).await {
                Ok(evidence) => Some(evidence),
                Err(err) => {
                    writeln!(self.out, "! {err:#}")?;
                    None
                }
            }
        };

        *self.dispute()?.draft_mut()? = draft;
        Ok(Step::Continue)
    }

    /// Submit the form and wait for the letter. Validation failures leave
    /// the form in place for the next turn to report.
    async fn draft_letter(&mut self) -> anyhow::Result<()> {
        let providers = self.providers;
        let drafter = providers.drafter.as_ref();
        let ticket = match self.dispute()?.submit_draft() {
            Ok(ticket) => ticket,
            Err(FlowError::Validation(_)) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        writeln!(self.out, "Drafting your letter...")?;
        let outcome = ticket.run(drafter).await;
        self.dispute()?.resolve(ticket.token(), outcome);
        Ok(())
    }

    /// Read a replacement letter, terminated by a line with a single `.`.
    async fn read_letter(&mut self) -> anyhow::Result<Option<String>> {
        writeln!(self.out, "Enter the new letter. Finish with a line containing only '.'")?;
        self.out.flush()?;
        let mut body = Vec::new();
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            if line.trim() == "." {
                return Ok(Some(body.join("\n")));
            }
            body.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adevo_ai::TemplateDrafter;
    use adevo_kyc::{FixtureLookup, NOT_FOUND_MESSAGE};

    fn providers() -> Providers {
        Providers {
            lookup: Box::new(FixtureLookup::demo()),
            drafter: Box::new(TemplateDrafter::new()),
            lookup_kind: "demo",
            drafter_kind: "template",
        }
    }

    async fn transcript(input: &str) -> String {
        let providers = providers();
        let mut out = Vec::new();
        Session::new(input.as_bytes(), &mut out, &providers)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn end_of_input_quits() {
        let out = transcript("").await;
        assert!(out.contains("Do you agree?"));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[tokio::test]
    async fn verified_user_sees_dashboard() {
        let out = transcript("y\n12345678901\nq\n").await;
        assert!(out.contains("=== CHINEDU ADEBAYO OKORO ==="));
        assert!(out.contains("95 / 100 (good)"));
        assert!(out.contains("******6789"));
        assert!(!out.contains("0123456789"));
    }

    #[tokio::test]
    async fn validation_and_lookup_failures_are_reported() {
        let out = transcript("y\n123\n99999999999\nq\n").await;
        assert!(out.contains("! BVN must be exactly 11 digits."));
        assert!(out.contains(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn retry_after_failure_can_switch_bvn() {
        let out = transcript("y\n99999999999\nn\n12345678901\nq\n").await;
        assert!(out.contains(NOT_FOUND_MESSAGE));
        assert!(out.contains("=== CHINEDU ADEBAYO OKORO ==="));
    }

    #[tokio::test]
    async fn dispute_is_drafted_and_submitted() {
        let out = transcript(
            "y\n12345678901\nd\ne\n\nFT24122XK9Q\n5,000\n2024-05-01\n\
             Transfer to my landlord was debited but never arrived.\n\nc\nd\nq\n",
        )
        .await;
        assert!(out.contains("Banks: 1) GTBank  2) Kuda Bank  3) First Bank  4) Access Bank  5) Other"));
        assert!(out.contains("Subject: Formal Complaint: Unresolved Failed Transfer - Ref: FT24122XK9Q"));
        assert!(out.contains("Dear GTBank Customer Support Team,"));
        assert!(out.contains("=== Dispute FT24122XK9Q ==="));
        assert!(out.contains("Pending"));
        assert!(out.contains("NGN 5,000"));
        // back on the dashboard before quitting
        assert_eq!(out.matches("=== CHINEDU ADEBAYO OKORO ===").count(), 2);
    }

    #[tokio::test]
    async fn incomplete_form_stays_on_form() {
        let out = transcript("y\n12345678901\nd\ne\n2\n\n\n\n\n\nc\nq\n").await;
        assert!(out.contains("! Transaction ID / reference is required."));
        assert!(!out.contains("Drafting your letter..."));
    }

    #[tokio::test]
    async fn edited_letter_is_kept() {
        let out = transcript(
            "y\n12345678901\nd\ne\n4\nREF-1\n250\n2024-05-01\nNo credit.\n\n\
             e\nDear Access Bank,\nPlease reverse REF-1.\n.\nx\nq\n",
        )
        .await;
        assert!(out.contains("Dear Access Bank Customer Support Team,"));
        assert!(out.contains("=== Draft letter REF-1 ===\n\nDear Access Bank,\nPlease reverse REF-1.\n"));
    }

    #[tokio::test]
    async fn other_bank_asks_for_a_name() {
        let out = transcript(
            "y\n12345678901\nd\ne\n5\nWema Bank\nREF-2\n100\n2024-05-01\nStuck.\n\nx\nq\n",
        )
        .await;
        assert!(out.contains("Bank name:"));
        assert!(out.contains("Dear Wema Bank Customer Support Team,"));
    }
}
