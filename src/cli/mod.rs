//! Non-interactive command-line host over the ledger core.

pub mod commands;
pub mod output;

pub use commands::{run, run_cli, suggest, CliError, COMMANDS};
