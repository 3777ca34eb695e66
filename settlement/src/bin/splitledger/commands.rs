use crate::cli::{Cli, Command, OutputFormat};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use splitledger_core::{Expense, User, UserBalance};
use splitledger_settlement::{Config, SettlementEngine, SettlementPlan};
use std::path::Path;
use std::process::ExitCode;

/// Input file: the same records a client would send one request at a time
#[derive(Debug, Deserialize)]
struct Batch {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

#[derive(Debug, Serialize)]
struct Rejection {
    record: String,
    code: &'static str,
    message: String,
}

#[derive(Debug, Default, Serialize)]
struct IngestReport {
    users_registered: usize,
    expenses_recorded: usize,
    rejections: Vec<Rejection>,
}

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    run(cli).map(ExitCode::from)
}

/// Run one command and return the process exit status
fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = load_config(cli.config.as_deref())?;
    let engine = SettlementEngine::new(config)?;

    match cli.command {
        Command::Balances(args) => {
            let report = ingest(&engine, &args.file)?;
            print_balances(&engine.compute_balances(), &report, cli.format)?;
            Ok(0)
        }
        Command::Settle(args) => {
            let report = ingest(&engine, &args.file)?;
            print_plan(&engine.settlement_plan(), &report, cli.format)?;
            Ok(0)
        }
        Command::Check(args) => {
            let report = ingest(&engine, &args.file)?;
            print_report(&report, cli.format)?;
            Ok(check_status(&report))
        }
    }
}

/// 1 when any record was rejected
fn check_status(report: &IngestReport) -> u8 {
    if report.rejections.is_empty() {
        0
    } else {
        1
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Config::from_env().context("loading config from environment"),
    }
}

/// Register users, then record expenses; rejected records are reported and skipped
fn ingest(engine: &SettlementEngine, file: &Path) -> anyhow::Result<IngestReport> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let batch: Batch = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", file.display()))?;

    let mut report = IngestReport::default();

    for user in batch.users {
        let record = format!("user {}", user.id);
        match engine.register_user(user) {
            Ok(_) => report.users_registered += 1,
            Err(err) => match err.as_rejection() {
                Some(rejection) => report.rejections.push(Rejection {
                    record,
                    code: rejection.code(),
                    message: rejection.to_string(),
                }),
                None => return Err(err.into()),
            },
        }
    }

    for expense in batch.expenses {
        let record = format!("expense {}", expense.id);
        match engine.record_expense(expense) {
            Ok(_) => report.expenses_recorded += 1,
            Err(err) => match err.as_rejection() {
                Some(rejection) => report.rejections.push(Rejection {
                    record,
                    code: rejection.code(),
                    message: rejection.to_string(),
                }),
                None => return Err(err.into()),
            },
        }
    }

    tracing::info!(
        users = report.users_registered,
        expenses = report.expenses_recorded,
        rejected = report.rejections.len(),
        "Batch ingested"
    );
    Ok(report)
}

fn print_rejections(report: &IngestReport) {
    for rejection in &report.rejections {
        eprintln!("rejected {} [{}]: {}", rejection.record, rejection.code, rejection.message);
    }
}

fn print_balances(
    balances: &[UserBalance],
    report: &IngestReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "balances": balances, "ingest": report });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            print_rejections(report);
            println!("{:<16} {:<24} {:>14}", "USER", "NAME", "BALANCE");
            for balance in balances {
                println!(
                    "{:<16} {:<24} {:>14}",
                    balance.user_id.as_str(),
                    balance.name,
                    balance.amount.to_string()
                );
            }
        }
    }
    Ok(())
}

fn print_plan(
    plan: &SettlementPlan,
    report: &IngestReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "plan": plan, "ingest": report });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            print_rejections(report);
            if plan.is_settled() {
                println!("All settled.");
                return Ok(());
            }
            for settlement in &plan.settlements {
                println!("{} -> {}: {}", settlement.from, settlement.to, settlement.amount);
            }
            println!(
                "{} payments, {} total ({} debtors, {} creditors)",
                plan.stats.transfer_count,
                plan.stats.total_transferred,
                plan.stats.debtor_count,
                plan.stats.creditor_count
            );
            if !plan.stats.residual.is_zero() {
                println!("unmatched residual: {}", plan.stats.residual);
            }
        }
    }
    Ok(())
}

fn print_report(report: &IngestReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            print_rejections(report);
            println!(
                "{} users registered, {} expenses recorded, {} rejected",
                report.users_registered,
                report.expenses_recorded,
                report.rejections.len()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;

    fn demo_batch() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../demo/trip.json")
    }

    fn batch_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("splitledger").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_ingest_demo_batch() {
        let engine = SettlementEngine::new(Config::default()).unwrap();
        let report = ingest(&engine, &demo_batch()).unwrap();

        assert_eq!(report.users_registered, 3);
        assert_eq!(report.expenses_recorded, 2);
        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].record, "expense e3");
        assert_eq!(report.rejections[0].code, "unknown_user");

        let payments: Vec<(String, String, String)> = engine
            .compute_settlement()
            .iter()
            .map(|s| (s.from.to_string(), s.to.to_string(), s.amount.to_string()))
            .collect();
        assert_eq!(
            payments,
            vec![
                ("C".to_string(), "A".to_string(), "45.00".to_string()),
                ("B".to_string(), "A".to_string(), "15.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_ingest_reports_each_rejection_kind() {
        let file = batch_file(
            r#"{
                "users": [
                    {"id": "A", "name": "Alice"},
                    {"id": "A", "name": "Again"},
                    {"id": "B", "name": ""}
                ],
                "expenses": [
                    {"id": "e1", "total_amount": "10", "paid_by": "A",
                     "splits": [{"user_id": "A", "amount": "9"}]}
                ]
            }"#,
        );
        let engine = SettlementEngine::new(Config::default()).unwrap();
        let report = ingest(&engine, file.path()).unwrap();

        let codes: Vec<&str> = report.rejections.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["duplicate_user", "invalid_input", "amount_mismatch"]);
        assert_eq!(report.users_registered, 1);
        assert_eq!(report.expenses_recorded, 0);
    }

    #[test]
    fn test_unreadable_batch_aborts() {
        let engine = SettlementEngine::new(Config::default()).unwrap();
        assert!(ingest(&engine, Path::new("/nonexistent/batch.json")).is_err());

        let file = batch_file(r#"{"users": [{"id": "A", "name": "Alice"}], "expenses": 5}"#);
        assert!(ingest(&engine, file.path()).is_err());
        assert!(engine.list_users().is_empty());
    }

    #[test]
    fn test_check_status() {
        let demo = demo_batch();
        assert_eq!(run(cli(&["check", demo.to_str().unwrap()])).unwrap(), 1);

        let clean = batch_file(r#"{"users": [{"id": "A", "name": "Alice"}]}"#);
        assert_eq!(run(cli(&["check", clean.path().to_str().unwrap()])).unwrap(), 0);

        // Rejections are reported but do not fail the query commands
        assert_eq!(run(cli(&["settle", demo.to_str().unwrap()])).unwrap(), 0);
        assert_eq!(
            run(cli(&["balances", "--format", "json", demo.to_str().unwrap()])).unwrap(),
            0
        );
    }

    #[test]
    fn test_config_file_is_loaded() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "[ledger]").unwrap();
        writeln!(config, "amount_tolerance = \"1.00\"").unwrap();

        let loaded = load_config(Some(config.path())).unwrap();
        assert_eq!(loaded.ledger.amount_tolerance.to_string(), "1.00");

        // A one-unit shortfall now passes validation
        let batch = batch_file(
            r#"{
                "users": [{"id": "A", "name": "Alice"}],
                "expenses": [{"id": "e1", "total_amount": "10", "paid_by": "A",
                              "splits": [{"user_id": "A", "amount": "9"}]}]
            }"#,
        );
        let args = cli(&[
            "--config",
            config.path().to_str().unwrap(),
            "check",
            batch.path().to_str().unwrap(),
        ]);
        assert_eq!(run(args).unwrap(), 0);

        assert!(load_config(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }
}
