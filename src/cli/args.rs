use crate::core::ChargeConfig;
use crate::types::parse_expiry;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Store, validate and charge cards on file
#[derive(Parser, Debug)]
#[command(name = "card-vault")]
#[command(about = "Store, validate and charge cards on file", long_about = None)]
pub struct CliArgs {
    /// Backing file of the card store
    #[arg(
        long = "store",
        value_name = "PATH",
        default_value = "cards.json",
        global = true,
        help = "Path to the JSON card store (created if missing)"
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available card operations
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the card on file for a user
    Show {
        /// Username to look up
        username: String,
    },

    /// Insert or update the card on file for a user
    Save {
        /// Username owning the card
        username: String,
        /// Card number, formatting characters allowed
        number: String,
        /// Expiry as YYYY-MM (end of month) or YYYY-MM-DD
        #[arg(value_parser = parse_expiry_arg)]
        expiry: NaiveDate,
    },

    /// Check the card on file for a user (exit code 2 when invalid)
    Validate {
        /// Username to check
        username: String,
    },

    /// Simulate a charge and print its confirmation code
    Charge {
        /// Amount to charge
        amount: Decimal,

        /// Give up after this many milliseconds
        #[arg(
            long = "timeout-ms",
            value_name = "MILLIS",
            help = "Charge timeout in milliseconds (default: 5000)"
        )]
        timeout_ms: Option<u64>,

        /// Simulated gateway latency in milliseconds
        #[arg(
            long = "latency-ms",
            value_name = "MILLIS",
            help = "Simulated gateway latency in milliseconds (default: 100)"
        )]
        latency_ms: Option<u64>,
    },
}

fn parse_expiry_arg(value: &str) -> Result<NaiveDate, String> {
    parse_expiry(value).ok_or_else(|| format!("invalid expiry '{}', expected YYYY-MM or YYYY-MM-DD", value))
}

impl CliArgs {
    /// Create a ChargeConfig from CLI arguments
    ///
    /// Values not given on the command line (and every value for commands other
    /// than `charge`) fall back to the defaults.
    pub fn to_charge_config(&self) -> ChargeConfig {
        match &self.command {
            Command::Charge {
                timeout_ms,
                latency_ms,
                ..
            } if timeout_ms.is_some() || latency_ms.is_some() => {
                let default = ChargeConfig::default();
                ChargeConfig::new(
                    timeout_ms.map(Duration::from_millis).unwrap_or(default.timeout),
                    latency_ms.map(Duration::from_millis).unwrap_or(default.latency),
                )
            }
            _ => ChargeConfig::default(),
        }
    }
}
