use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::storage::{with_mbf_extension, LoadWarning, StorageBackend};

/// Metadata describing the outcome of an open.
#[derive(Debug)]
pub struct LoadMetadata {
    pub path: PathBuf,
    pub warnings: Vec<LoadWarning>,
    pub skipped_lines: usize,
}

/// Facade that pairs the working ledger with the file it came from.
///
/// Opening a file swaps the ledger contents in place, so listeners subscribed
/// to [`LedgerManager::ledger_mut`] survive open and new.
pub struct LedgerManager {
    current: Ledger,
    current_path: Option<PathBuf>,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self::with_ledger(storage, Ledger::new())
    }

    pub fn with_ledger(storage: Box<dyn StorageBackend>, ledger: Ledger) -> Self {
        Self {
            current: ledger,
            current_path: None,
            storage,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.current
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.current
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn open(&mut self, path: &Path) -> Result<LoadMetadata> {
        let report = self.storage.load(path)?;
        self.current.replace_contents(report.ledger);
        self.current_path = Some(path.to_path_buf());
        Ok(LoadMetadata {
            path: path.to_path_buf(),
            warnings: report.warnings,
            skipped_lines: report.skipped_lines,
        })
    }

    /// Saves to the file the ledger was opened from or last saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.current_path.clone().ok_or_else(|| {
            LedgerError::InvalidInput("no file chosen for the current ledger".into())
        })?;
        self.storage.save(&self.current, &path)?;
        Ok(path)
    }

    /// Saves under `path`, adding the `.mbf` extension when missing, and makes
    /// it the current file.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        let path = with_mbf_extension(path);
        self.storage.save(&self.current, &path)?;
        self.current_path = Some(path.clone());
        Ok(path)
    }

    /// Starts over: empty partitions, zero budget, no file.
    pub fn new_ledger(&mut self) {
        info!("starting a new ledger");
        self.current.clear();
        self.current_path = None;
    }
}
