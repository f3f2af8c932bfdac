//! Card Vault CLI
//!
//! Command-line interface for storing, validating and charging cards on file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- save alice "4532 0151 1283 0366" 2030-01
//! cargo run -- show alice
//! cargo run -- validate alice
//! cargo run -- --store /var/lib/cards.json charge 19.99 --timeout-ms 500
//! ```
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default: `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable store, charge timeout, etc.)
//! - 2: `validate` found the card invalid or missing

use card_vault::cli::{self, CommandStatus};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize tracing on stderr so stdout carries only command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let mut output = std::io::stdout();
    match cli::run(&args, &mut output) {
        Ok(CommandStatus::Success) => {}
        Ok(CommandStatus::InvalidCard) => process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
