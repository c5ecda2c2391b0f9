//! CLI for the order bridge.
//!
//! Argument errors are not printed by clap: they become a failure envelope
//! like every other error, so the calling engine only ever parses JSON.
//! Only `--help` and `--version` print plain text.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::error::BridgeError;
use crate::domain::order::Side;
use crate::usecases::dispatcher::Command;

/// Polymarket order bridge: one venue operation per invocation, one JSON
/// object on stdout.
#[derive(Parser, Debug)]
#[command(name = "order-bridge", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (defaults to executor.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place a limit order (GTC)
    Place(PlaceArgs),
    /// Place a market order (FOK) at the best opposing price
    Market(MarketArgs),
    /// Get USDC balance
    Balance,
    /// Get current positions
    Positions,
    /// Cancel an order
    Cancel(CancelArgs),
    /// Cancel all open orders
    CancelAll,
    /// Derive API key from private key
    DeriveKey,
}

#[derive(Args, Debug)]
pub struct PlaceArgs {
    /// Token ID
    #[arg(long)]
    token: String,
    /// Order side: BUY or SELL, any case (echoed back uppercase)
    #[arg(long)]
    side: Side,
    /// Number of shares
    #[arg(long)]
    size: Decimal,
    /// Price per share
    #[arg(long)]
    price: Decimal,
}

#[derive(Args, Debug)]
pub struct MarketArgs {
    /// Token ID
    #[arg(long)]
    token: String,
    /// Order side: BUY or SELL, any case (echoed back uppercase)
    #[arg(long)]
    side: Side,
    /// Number of shares
    #[arg(long)]
    size: Decimal,
}

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Order ID to cancel
    #[arg(long)]
    order_id: String,
}

/// Result of parsing the command line.
#[derive(Debug)]
pub enum ParseOutcome {
    /// Arguments are valid.
    Run(Cli),
    /// `--help` or `--version`: print and exit 0.
    Display(String),
    /// Anything else: report through the envelope.
    Invalid(BridgeError),
}

/// Parse arguments without letting clap print or exit.
pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => ParseOutcome::Run(cli),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                ParseOutcome::Display(err.render().to_string())
            }
            ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                ParseOutcome::Invalid(BridgeError::InvalidInput(
                    "Unknown command. Use --help for usage.".to_string(),
                ))
            }
            _ => ParseOutcome::Invalid(BridgeError::InvalidInput(summarize(&err))),
        },
    }
}

/// First line of clap's message without the `error: ` prefix.
fn summarize(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default().trim();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

impl Commands {
    /// Convert parsed arguments into a dispatcher command.
    pub fn into_command(self) -> Command {
        match self {
            Self::Place(a) => Command::Place {
                token_id: a.token,
                side: a.side,
                size: a.size,
                price: a.price,
            },
            Self::Market(a) => Command::Market {
                token_id: a.token,
                side: a.side,
                size: a.size,
            },
            Self::Balance => Command::Balance,
            Self::Positions => Command::Positions,
            Self::Cancel(a) => Command::Cancel {
                order_id: a.order_id,
            },
            Self::CancelAll => Command::CancelAll,
            Self::DeriveKey => Command::DeriveKey,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn run(args: &[&str]) -> Command {
        match parse_args(std::iter::once("order-bridge").chain(args.iter().copied())) {
            ParseOutcome::Run(cli) => cli.command.into_command(),
            other => panic!("expected Run, got {other:?}"),
        }
    }

    fn invalid(args: &[&str]) -> BridgeError {
        match parse_args(std::iter::once("order-bridge").chain(args.iter().copied())) {
            ParseOutcome::Invalid(err) => err,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_place_parses_decimals_exactly() {
        let cmd = run(&[
            "place", "--token", "123", "--side", "BUY", "--size", "10.50", "--price", "0.55",
        ]);
        assert_eq!(
            cmd,
            Command::Place {
                token_id: "123".to_string(),
                side: Side::Buy,
                size: dec!(10.50),
                price: dec!(0.55),
            }
        );
    }

    #[test]
    fn test_all_subcommand_names() {
        assert_eq!(run(&["balance"]), Command::Balance);
        assert_eq!(run(&["positions"]), Command::Positions);
        assert_eq!(run(&["cancel-all"]), Command::CancelAll);
        assert_eq!(run(&["derive-key"]), Command::DeriveKey);
        assert_eq!(
            run(&["cancel", "--order-id", "0xabc"]),
            Command::Cancel {
                order_id: "0xabc".to_string()
            }
        );
        assert_eq!(
            run(&["market", "--token", "9", "--side", "sell", "--size", "2"]),
            Command::Market {
                token_id: "9".to_string(),
                side: Side::Sell,
                size: dec!(2),
            }
        );
    }

    #[test]
    fn test_bad_side_is_invalid_input() {
        let err = invalid(&["market", "--token", "9", "--side", "HOLD", "--size", "2"]);
        assert_eq!(err.error_type(), "InvalidInput");
        assert!(err.to_string().contains("HOLD"));
    }

    #[test]
    fn test_missing_flag_and_bad_decimal() {
        assert_eq!(invalid(&["place", "--token", "1"]).error_type(), "InvalidInput");
        let err = invalid(&["market", "--token", "9", "--side", "BUY", "--size", "ten"]);
        assert_eq!(err.error_type(), "InvalidInput");
    }

    #[test]
    fn test_no_subcommand() {
        let err = invalid(&[]);
        assert_eq!(err.to_string(), "Unknown command. Use --help for usage.");
        assert_eq!(invalid(&["withdraw"]).error_type(), "InvalidInput");
    }

    #[test]
    fn test_side_help_documents_uppercase_echo() {
        match parse_args(["order-bridge", "place", "--help"]) {
            ParseOutcome::Display(text) => assert!(text.contains("echoed back uppercase")),
            other => panic!("expected Display, got {other:?}"),
        }
    }

    #[test]
    fn test_help_is_displayed() {
        let outcome = parse_args(["order-bridge", "--help"]);
        assert!(matches!(outcome, ParseOutcome::Display(text) if text.contains("place")));
    }
}
