use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "splitledger",
    about = "Shared expense balances and debt settlement",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the net balance of every user
    Balances(BatchArgs),
    /// Show the payments that clear every balance
    Settle(BatchArgs),
    /// Load a batch and report rejected records
    Check(BatchArgs),
}

#[derive(Args)]
pub struct BatchArgs {
    /// JSON file with `users` and `expenses` arrays
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settle_with_global_flags() {
        let cli = Cli::try_parse_from([
            "splitledger",
            "settle",
            "trip.json",
            "--format",
            "json",
            "--config",
            "ledger.toml",
            "-v",
        ])
        .unwrap();

        if let Command::Settle(args) = &cli.command {
            assert_eq!(args.file, PathBuf::from("trip.json"));
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("ledger.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["splitledger", "balances", "trip.json"]).unwrap();
        assert!(matches!(cli.command, Command::Balances(_)));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli =
            Cli::try_parse_from(["splitledger", "--format", "json", "check", "trip.json"]).unwrap();
        assert!(matches!(cli.command, Command::Check(_)));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["splitledger", "settle"]).is_err());
        assert!(Cli::try_parse_from(["splitledger", "settle", "t.json", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["splitledger", "pay", "t.json"]).is_err());
    }
}
