//! Polymarket Order Bridge — Entry Point
//!
//! Performs exactly one venue operation and prints exactly one JSON
//! envelope on stdout. Logs go to stderr.
//!
//! Wiring sequence:
//! 1. Load `.env` (optional)
//! 2. Parse CLI (argument errors become a failure envelope)
//! 3. Load executor.toml + env overrides, validate
//! 4. Init tracing (JSON structured logging on stderr)
//! 5. Load credentials from env (missing signing key fails here, before
//!    any network call)
//! 6. Create ClobVenue (implements VenueClient port)
//! 7. Dispatch the command, print the envelope, exit 0/1

use std::io::Write;
use std::process::ExitCode;

use tracing::info;

use polymarket_order_bridge::adapters::api::ClobVenue;
use polymarket_order_bridge::cli::{ParseOutcome, parse_args};
use polymarket_order_bridge::config::credentials::Credentials;
use polymarket_order_bridge::config::{LoggingConfig, loader};
use polymarket_order_bridge::domain::{BridgeError, Envelope};
use polymarket_order_bridge::usecases::Dispatcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ── 1. .env is optional ─────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Parse arguments ──────────────────────────────────
    let cli = match parse_args(std::env::args_os()) {
        ParseOutcome::Run(cli) => cli,
        ParseOutcome::Display(text) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        ParseOutcome::Invalid(err) => return emit(&Envelope::failure(&err)),
    };

    // ── 3. Load configuration ───────────────────────────────
    let config = match loader::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            return emit(&Envelope::failure(&BridgeError::Config(format!("{e:#}"))));
        }
    };

    // ── 4. Structured JSON logging on stderr ────────────────
    init_tracing(&config.logging);

    let command = cli.command.into_command();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = command.name(),
        chain_id = config.venue.chain_id,
        "Order bridge invoked"
    );

    // ── 5. Credentials ──────────────────────────────────────
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => return emit(&Envelope::failure(&err)),
    };

    // ── 6. Venue client ─────────────────────────────────────
    let venue = match ClobVenue::new(config.venue, &credentials) {
        Ok(venue) => venue,
        Err(err) => return emit(&Envelope::failure(&err)),
    };

    // ── 7. Dispatch ─────────────────────────────────────────
    let envelope = Dispatcher::new(venue).run(command).await;
    emit(&envelope)
}

/// Print the envelope as one line of JSON and map it to the exit code.
fn emit(envelope: &Envelope) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    // stdout closed: the exit code still reports the outcome.
    let _ = writeln!(stdout, "{}", envelope.to_json());
    let _ = stdout.flush();

    if envelope.exit_code() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();
}
