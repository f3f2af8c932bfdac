//! Command dispatch for the card-vault binary
//!
//! Each command builds a [`CardService`] over a [`JsonFileStore`] at the path
//! given on the command line and writes its result to the supplied writer.

use super::args::{CliArgs, Command};
use crate::core::{CardService, ChargeService, SaveOutcome};
use crate::io::JsonFileStore;
use crate::types::{CardRecord, Result};
use std::io::Write;

/// How a successfully executed command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command did what was asked
    Success,
    /// `validate` ran and the card is invalid or missing
    InvalidCard,
}

/// Execute the parsed command, writing human-readable output to `output`
///
/// `charge` builds its own single-threaded tokio runtime for the race between
/// the charge and its timer.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<CommandStatus> {
    let config = args.to_charge_config();
    let service = CardService::new(
        JsonFileStore::new(&args.store),
        ChargeService::simulated(&config),
    );

    match &args.command {
        Command::Show { username } => {
            let record = service.load_for_user(username)?;
            if record.is_empty() {
                writeln!(output, "No card on file for {}", username)?;
            } else {
                write_card(&record, output)?;
            }
            Ok(CommandStatus::Success)
        }
        Command::Save {
            username,
            number,
            expiry,
        } => {
            let record = CardRecord::new(username.as_str(), number.as_str(), *expiry);
            match service.save_for_user(&record)? {
                SaveOutcome::Persisted => writeln!(output, "Saved card for {}", username)?,
                SaveOutcome::Recovered => writeln!(
                    output,
                    "Card store was reset after a failed write; card for {} was not saved",
                    username
                )?,
            }
            Ok(CommandStatus::Success)
        }
        Command::Validate { username } => {
            let record = service.load_for_user(username)?;
            if !record.is_empty() && service.is_valid(&record) {
                writeln!(output, "valid")?;
                Ok(CommandStatus::Success)
            } else {
                writeln!(output, "invalid")?;
                Ok(CommandStatus::InvalidCard)
            }
        }
        Command::Charge { amount, .. } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let code = runtime
                .block_on(service.charge_card_with_timeout(*amount, config.timeout))?;
            writeln!(output, "{}", code)?;
            Ok(CommandStatus::Success)
        }
    }
}

fn write_card(record: &CardRecord, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "user:   {}", record.username)?;
    writeln!(output, "number: {}", record.masked_number())?;
    writeln!(output, "expiry: {}", record.expiry_text())?;
    Ok(())
}
