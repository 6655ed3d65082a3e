mod config;
mod display;
mod evidence;
mod session;

use std::path::PathBuf;

use adevo_core::BankName;
use adevo_flow::{FlowCoordinator, OnboardingMachine};
use adevo_kyc::IdentityLookup;
use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::io::BufReader;
use tracing::Level;

use crate::config::{ProviderArgs, Providers};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "adevo", version, about = "Adevo: BVN financial health score and failed-transfer disputes")]
struct Cli {
    #[command(flatten)]
    providers: ProviderArgs,

    /// Log flow transitions and provider calls to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a BVN and print the Adevo score dashboard.
    Score {
        /// 11-digit Bank Verification Number.
        #[arg(long)]
        bvn: String,
    },

    /// Verify a BVN, draft a dispute letter for a failed transfer, and optionally submit it.
    Dispute {
        /// 11-digit Bank Verification Number.
        #[arg(long)]
        bvn: String,

        /// Transaction ID or reference from the debit alert.
        #[arg(long)]
        transaction_id: String,

        /// Amount debited, in naira.
        #[arg(long)]
        amount: Decimal,

        /// Date of the transaction (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,

        /// What happened, in your own words.
        #[arg(long)]
        description: String,

        /// Bank the letter is addressed to. Defaults to the first linked account's bank.
        #[arg(long)]
        bank: Option<String>,

        /// Evidence file to reference in the letter (e.g. a debit alert screenshot).
        #[arg(long)]
        evidence: Option<PathBuf>,

        /// Also write the draft letter to this file.
        #[arg(long)]
        letter_out: Option<PathBuf>,

        /// Submit the dispute after drafting.
        #[arg(long)]
        confirm: bool,

        /// Print the submission as JSON instead of a status card.
        #[arg(long, requires = "confirm")]
        json: bool,
    },

    /// Interactive session: consent, BVN verification, dashboard and disputes.
    Session,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::INFO } else { Level::WARN })
        .init();
    tracing::info!("adevo v{}", env!("CARGO_PKG_VERSION"));

    let providers = cli.providers.providers()?;

    match cli.command {
        Command::Score { bvn } => cmd_score(&providers, &bvn).await,
        Command::Dispute {
            bvn,
            transaction_id,
            amount,
            date,
            description,
            bank,
            evidence,
            letter_out,
            confirm,
            json,
        } => {
            let mut coordinator = FlowCoordinator::new();
            verify(&mut coordinator, providers.lookup.as_ref(), &bvn).await?;

            let dispute = coordinator.start_dispute()?;
            let mut details = dispute.details().clone();
            if let Some(bank) = bank {
                details.bank = BankName::parse(&bank);
            }
            details.transaction_id = transaction_id;
            details.amount = amount;
            details.transaction_date = Some(date);
            details.description = description;
            if let Some(path) = evidence {
                details.evidence = Some(evidence::load_evidence(&path).await?);
            }

            eprintln!("Drafting letter to {}...", details.bank);
            dispute.generate(details, providers.drafter.as_ref()).await?;
            if let Some(message) = dispute.error_message() {
                bail!("letter generation failed: {message}");
            }
            let letter = dispute.letter().context("no letter was drafted")?;
            println!(
                "{}",
                display::letter_card(&dispute.details().transaction_id, letter)
            );

            if let Some(path) = letter_out {
                tokio::fs::write(&path, letter)
                    .await
                    .with_context(|| format!("writing letter to {}", path.display()))?;
                eprintln!("Letter written to {}", path.display());
            }

            if !confirm {
                eprintln!("Re-run with --confirm to submit this dispute.");
                return Ok(());
            }
            let submission = dispute.confirm()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&submission)?);
            } else {
                println!("{}", display::status_card(&submission));
            }
            coordinator.exit_dispute()?;
            Ok(())
        }
        Command::Session => {
            eprintln!(
                "Identity provider: {}, letter drafter: {}",
                providers.lookup_kind, providers.drafter_kind
            );
            let stdin = BufReader::new(tokio::io::stdin());
            Session::new(stdin, std::io::stdout(), &providers)
                .run()
                .await
        }
    }
}

async fn cmd_score(providers: &Providers, bvn: &str) -> anyhow::Result<()> {
    let mut coordinator = FlowCoordinator::new();
    let onboarding = verify(&mut coordinator, providers.lookup.as_ref(), bvn).await?;
    let record = onboarding.record().context("no verified identity")?;
    let score = onboarding.score().context("no score computed")?;
    println!("{}", display::dashboard_card(record, score));
    Ok(())
}

/// Run onboarding non-interactively (consent implied by invoking the
/// command) and fail with the provider's message if the lookup fails.
async fn verify<'a>(
    coordinator: &'a mut FlowCoordinator,
    lookup: &dyn IdentityLookup,
    bvn: &str,
) -> anyhow::Result<&'a OnboardingMachine> {
    let onboarding = coordinator
        .onboarding_mut()
        .context("onboarding is not active")?;
    onboarding.agree()?;
    eprintln!("Verifying BVN...");
    onboarding.lookup(bvn, lookup).await?;
    if let Some(message) = onboarding.error_message() {
        bail!("{message}");
    }
    Ok(onboarding)
}
