//! # Command Line Interface
//!
//! Every command runs against a built [`VaultContainer`] and writes its
//! result to the supplied writer. Pipeline commands stream their progress
//! steps as they happen.

use std::io::Write;

use anyhow::{anyhow, bail, Context};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use qv_05_transaction_pipeline::TransactionPipelineApi;
use qv_06_vote_casting::VoteCastingApi;
use shared_types::{Election, ElectionOption, OperationMode, ProcessStep, TransactionRequest};

use crate::container::VaultContainer;

/// Quantum-Vault: quantum-key secured payments, record access and voting
#[derive(Parser, Debug)]
#[command(name = "vault-runtime")]
#[command(about = "Quantum-key secured payments, medical record access and voting")]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Channel mode selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Quantum-key gated channel
    Quantum,
    /// Classical channel
    Normal,
}

impl From<ModeArg> for OperationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Quantum => OperationMode::Quantum,
            ModeArg::Normal => OperationMode::Normal,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Send a payment
    Pay {
        /// Paying user
        #[arg(short, long)]
        user: String,
        /// Amount in minor units
        #[arg(short, long)]
        amount: u64,
        /// Beneficiary
        #[arg(short, long)]
        to: String,
        /// Channel mode
        #[arg(short, long, value_enum, default_value = "quantum")]
        mode: ModeArg,
        /// Put an eavesdropper on the key exchange
        #[arg(long)]
        eve: bool,
    },

    /// Open a patient's medical record
    AccessRecord {
        /// Requesting user
        #[arg(short, long)]
        user: String,
        /// Patient id
        #[arg(short, long)]
        patient: String,
        /// Reason for access
        #[arg(short, long)]
        reason: String,
        /// Channel mode
        #[arg(short, long, value_enum, default_value = "quantum")]
        mode: ModeArg,
        /// Put an eavesdropper on the key exchange
        #[arg(long)]
        eve: bool,
    },

    /// Cast a ballot
    Vote {
        /// Election id
        #[arg(short, long)]
        election: String,
        /// Option id
        #[arg(short, long)]
        option: String,
        /// Put an eavesdropper on the key exchange
        #[arg(long)]
        eve: bool,
    },

    /// Look up a ballot receipt
    VerifyReceipt {
        /// Receipt token
        token: String,
    },

    /// Create an election that opens now (replaces one with no ballots)
    CreateElection {
        /// Election id
        #[arg(long)]
        id: String,
        /// Election title
        #[arg(long)]
        title: String,
        /// Option as `id=label`; repeat for each option
        #[arg(long = "option", value_parser = parse_option, required = true)]
        options: Vec<(String, String)>,
        /// Hours until the election closes
        #[arg(long, default_value = "24")]
        hours: u32,
    },

    /// List elections
    Elections,

    /// Count the ballots of an election
    Tally {
        /// Election id
        election: String,
    },

    /// List transactions of one mode, newest first
    History {
        /// Channel mode
        #[arg(short, long, value_enum, default_value = "quantum")]
        mode: ModeArg,
    },

    /// Remove partial writes left by an interrupted run
    Reconcile,

    /// Print metrics in Prometheus text format
    Metrics,
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, label)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), label.trim().to_string()))
        }
        _ => Err(format!("expected `id=label`, got `{}`", raw)),
    }
}

fn print_step<W: Write + ?Sized>(out: &mut W, step: &ProcessStep) {
    let _ = writeln!(
        out,
        "[{:>3.0}%] {} - {}",
        step.progress * 100.0,
        step.status,
        step.detail
    );
}

fn print_json<W: Write + ?Sized, T: serde::Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Run `command` against `container`, writing results to `out`.
pub async fn execute<W>(
    command: Command,
    container: &VaultContainer,
    out: &mut W,
) -> anyhow::Result<()>
where
    W: Write + Send + ?Sized,
{
    match command {
        Command::Pay {
            user,
            amount,
            to,
            mode,
            eve,
        } => {
            let request = TransactionRequest::banking_payment(user, amount, to)
                .with_mode(mode.into())
                .with_simulated_attack(eve);
            run_transaction(container, request, out).await
        }

        Command::AccessRecord {
            user,
            patient,
            reason,
            mode,
            eve,
        } => {
            let request = TransactionRequest::medical_record_access(user, patient, reason)
                .with_mode(mode.into())
                .with_simulated_attack(eve);
            run_transaction(container, request, out).await
        }

        Command::Vote {
            election,
            option,
            eve,
        } => {
            let result = {
                let mut sink = |step: ProcessStep| print_step(&mut *out, &step);
                container
                    .votes
                    .cast_vote_observed(&election, &option, eve, &mut sink)
                    .await
            };
            let receipt = result.map_err(|e| anyhow!("{} ({})", e, e.kind()))?;
            print_json(out, &receipt)
        }

        Command::VerifyReceipt { token } => {
            match container.votes.verify_receipt(&token).await? {
                Some(receipt) => print_json(out, &receipt),
                None => bail!("No ballot was committed under receipt {}", token),
            }
        }

        Command::CreateElection {
            id,
            title,
            options,
            hours,
        } => {
            let opens_at = Utc::now();
            let election = Election {
                election_id: id,
                title,
                options: options
                    .into_iter()
                    .map(|(option_id, label)| ElectionOption { option_id, label })
                    .collect(),
                opens_at,
                closes_at: opens_at + Duration::hours(i64::from(hours)),
            };
            container
                .votes
                .register_election(election.clone())
                .await
                .context("Election rejected")?;
            print_json(out, &election)
        }

        Command::Elections => {
            let elections = container.votes.elections().await?;
            print_json(out, &elections)
        }

        Command::Tally { election } => {
            let tally = container.votes.tally(&election).await?;
            print_json(out, &tally)
        }

        Command::History { mode } => {
            let records = container.transactions.history_by_mode(mode.into()).await?;
            print_json(out, &records)
        }

        Command::Reconcile => {
            let report = container.recover().await?;
            writeln!(
                out,
                "Scanned {} keys; removed {} orphan keys and {} dangling index entries",
                report.keys_scanned, report.orphan_keys_removed, report.dangling_indexes_removed
            )?;
            Ok(())
        }

        Command::Metrics => {
            let text = quantum_telemetry::gather_metrics()?;
            write!(out, "{}", text)?;
            Ok(())
        }
    }
}

async fn run_transaction<W>(
    container: &VaultContainer,
    request: TransactionRequest,
    out: &mut W,
) -> anyhow::Result<()>
where
    W: Write + Send + ?Sized,
{
    let result = {
        let mut sink = |step: ProcessStep| print_step(&mut *out, &step);
        container
            .transactions
            .process_transaction(request, &mut sink)
            .await
    };
    let record = result.map_err(|e| anyhow!("{} ({})", e, e.kind()))?;
    print_json(out, &record)
}
