use std::{io, path::PathBuf};

use thiserror::Error;

use crate::ledger::Partition;

/// Error type that captures ledger, codec and storage failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Malformed row: expected {expected} fields, found {found}")]
    MalformedRow { expected: usize, found: usize },
    #[error("Invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("Invalid budget line `{0}`")]
    InvalidBudgetLine(String),
    #[error("Row {index} out of range for {partition} ({len} rows)")]
    IndexOutOfRange {
        partition: Partition,
        index: usize,
        len: usize,
    },
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors raised while loading or saving user preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
