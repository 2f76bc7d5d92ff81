pub mod codec;
pub mod mbf_backend;

use std::path::Path;

use crate::{errors::Result, ledger::Ledger};

pub use codec::{decode, decode_with_report, encode, LoadReport, LoadWarning};
pub use mbf_backend::{is_mbf_file, with_mbf_extension, MbfStorage, EXTENSION};

/// Abstraction over where ledgers are read from and written to.
pub trait StorageBackend {
    fn load(&self, path: &Path) -> Result<LoadReport>;
    fn save(&self, ledger: &Ledger, path: &Path) -> Result<()>;
}
