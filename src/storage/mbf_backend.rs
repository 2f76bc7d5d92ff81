use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use super::{
    codec::{self, LoadReport},
    StorageBackend,
};
use crate::{
    errors::{LedgerError, Result},
    ledger::{CategoryList, Ledger},
};

/// File extension of saved ledgers.
pub const EXTENSION: &str = "mbf";
const TMP_SUFFIX: &str = "tmp";

/// Reads and writes `.mbf` files on the local filesystem.
#[derive(Debug, Clone)]
pub struct MbfStorage {
    default_categories: CategoryList,
}

impl MbfStorage {
    pub fn new(default_categories: CategoryList) -> Self {
        Self { default_categories }
    }

    pub fn default_categories(&self) -> &CategoryList {
        &self.default_categories
    }
}

impl Default for MbfStorage {
    fn default() -> Self {
        Self::new(CategoryList::with_defaults())
    }
}

impl StorageBackend for MbfStorage {
    fn load(&self, path: &Path) -> Result<LoadReport> {
        load_from_path(path, &self.default_categories)
    }

    fn save(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        save_to_path(ledger, path)
    }
}

/// Reads and decodes a ledger file in one blocking call.
pub fn load_from_path(path: &Path, defaults: &CategoryList) -> Result<LoadReport> {
    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => LedgerError::FileNotFound(path.to_path_buf()),
        _ => LedgerError::Io(err),
    })?;
    let report = codec::decode_with_report(&text, defaults);
    info!(
        path = %path.display(),
        rows = report.ledger.row_count(),
        warnings = report.warnings.len(),
        "ledger loaded"
    );
    Ok(report)
}

/// Encodes `ledger` and writes it next to `path` before renaming it into
/// place, so a failed write leaves any previous file intact.
pub fn save_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let text = codec::encode(ledger);
    let tmp = tmp_path(path);
    let written = write_atomic(&tmp, &text).and_then(|_| fs::rename(&tmp, path));
    if let Err(source) = written {
        if tmp.is_file() {
            let _ = fs::remove_file(&tmp);
        }
        warn!(path = %path.display(), error = %source, "ledger save failed");
        return Err(LedgerError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    info!(path = %path.display(), rows = ledger.row_count(), "ledger saved");
    Ok(())
}

/// Appends `.mbf` unless the path already ends with it (any case).
pub fn with_mbf_extension(path: &Path) -> PathBuf {
    if is_mbf_file(path) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

pub fn is_mbf_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION))
}

/// Sibling file a save writes before renaming over `path`.
#[doc(hidden)]
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
