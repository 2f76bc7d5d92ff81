mod common;

use std::fs;

use common::{sample_ledger, saved_ledger};
use monthly_budget::{
    ledger::{CategoryList, Partition, Row},
    storage::{
        is_mbf_file,
        mbf_backend::{self, tmp_path},
        MbfStorage, StorageBackend,
    },
    LedgerError,
};
use tempfile::tempdir;

#[test]
fn save_and_load_through_backend() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nested").join("may.mbf");
    let backend = MbfStorage::default();

    backend.save(&sample_ledger(), &path).unwrap();
    assert!(is_mbf_file(&path));
    assert!(!tmp_path(&path).exists());

    let report = backend.load(&path).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.ledger.row_count(), 4);
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("absent.mbf");
    let err = MbfStorage::default().load(&path).unwrap_err();
    assert!(matches!(err, LedgerError::FileNotFound(ref missing) if *missing == path));
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let mut ledger = sample_ledger();
    let (_guard, path) = saved_ledger(&ledger);
    let original = fs::read_to_string(&path).unwrap();

    // a directory at the temp path makes File::create fail
    fs::create_dir_all(tmp_path(&path)).unwrap();
    ledger.add_row(Partition::Variable, Row::new("May 9", "Food", "Cake", "-12"));

    let result = mbf_backend::save_to_path(&ledger, &path);
    assert!(matches!(result, Err(LedgerError::Write { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn windows_line_endings_load() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("crlf.mbf");
    fs::write(
        &path,
        "250\r\nFood\tRent\t\r\nvariable\tMay 2\tFood\tLunch\t-10\r\n",
    )
    .unwrap();

    let report = mbf_backend::load_from_path(&path, &CategoryList::with_defaults()).unwrap();
    assert_eq!(report.ledger.budget(), 250.0);
    assert_eq!(report.ledger.rows(Partition::Variable)[0].amount(), "-10");
}

#[test]
fn configured_defaults_apply_when_file_has_no_categories() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("budget-only.mbf");
    fs::write(&path, "75\n").unwrap();

    let backend = MbfStorage::new(CategoryList::from_names(["Books", "Games"]));
    let report = backend.load(&path).unwrap();
    assert_eq!(report.ledger.categories().to_vec(), ["Books", "Games"]);
}
