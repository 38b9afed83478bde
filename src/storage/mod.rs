//! Reading and writing expense tables on disk.
//!
//! The durable snapshot is a pair of files: the primary CSV file, which is what gets loaded at the
//! start of a session, and a secondary XLSX copy of the same rows for spreadsheet tools. Both are
//! written on every save.

mod delimited;
mod workbook;

use crate::error::Res;
use crate::ledger::Ledger;
use crate::model::Table;
use crate::utils;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// The kinds of files an import can read, chosen by file extension.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Res<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(FileKind::Spreadsheet),
            _ => bail!(
                "Unsupported file type '{}', expected a .csv, .xlsx or .xls file",
                path.display()
            ),
        }
    }
}

/// Reads a CSV file or the first worksheet of a spreadsheet into a raw `Table`.
pub fn read_table(path: &Path) -> Res<Table> {
    let kind = FileKind::from_path(path)?;
    trace!("Reading {} as {kind:?}", path.display());
    match kind {
        FileKind::Csv => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("Unable to open file {}", path.display()))?;
            delimited::read_table(std::io::BufReader::new(f))
                .with_context(|| format!("Unable to read {}", path.display()))
        }
        FileKind::Spreadsheet => workbook::read_table(path),
    }
}

/// Where the snapshot files live.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Storage {
    csv_path: PathBuf,
    xlsx_path: PathBuf,
}

impl Storage {
    pub fn new(csv_path: impl Into<PathBuf>, xlsx_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            xlsx_path: xlsx_path.into(),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn xlsx_path(&self) -> &Path {
        &self.xlsx_path
    }

    /// Loads the ledger from the primary CSV file. Returns `None` when the file does not exist or
    /// is empty.
    pub fn load(&self) -> Res<Option<Ledger>> {
        if !self.csv_path.is_file() {
            return Ok(None);
        }
        let table = read_table(&self.csv_path)?;
        if table.headers().is_empty() {
            return Ok(None);
        }
        let (ledger, report) = Ledger::from_table(&table)
            .with_context(|| format!("The snapshot {} is invalid", self.csv_path.display()))?;
        if !report.invalid_dates.is_empty() {
            debug!(
                "The snapshot holds {} expense(s) without a valid date",
                report.invalid_dates.len()
            );
        }
        Ok(Some(ledger))
    }

    /// Writes both snapshot files.
    ///
    /// Both files are encoded in memory and staged next to their targets first. If anything fails
    /// up to that point, the staged files are removed and the previous snapshot is untouched.
    /// Only then are the staged files moved into place, the XLSX copy first and the CSV last.
    pub fn save(&self, ledger: &Ledger) -> Res<()> {
        let csv = delimited::encode(ledger.expenses())?;
        let xlsx = workbook::encode(ledger.expenses())?;

        let csv_tmp = utils::staging_path(&self.csv_path);
        let xlsx_tmp = utils::staging_path(&self.xlsx_path);

        if let Err(e) = self.stage(&csv_tmp, &csv, &xlsx_tmp, &xlsx) {
            for tmp in [&csv_tmp, &xlsx_tmp] {
                if let Err(cleanup) = utils::remove(tmp) {
                    warn!("{cleanup:#}");
                }
            }
            return Err(e);
        }

        utils::rename(&xlsx_tmp, &self.xlsx_path)?;
        utils::rename(&csv_tmp, &self.csv_path)?;
        debug!(
            "Saved {} expense(s) to {} and {}",
            ledger.len(),
            self.csv_path.display(),
            self.xlsx_path.display()
        );
        Ok(())
    }

    fn stage(&self, csv_tmp: &Path, csv: &[u8], xlsx_tmp: &Path, xlsx: &[u8]) -> Res<()> {
        for path in [&self.csv_path, &self.xlsx_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                utils::make_dir(parent)?;
            }
        }
        utils::write(csv_tmp, csv)?;
        utils::write(xlsx_tmp, xlsx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expense;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> Storage {
        Storage::new(
            dir.path().join("data").join("expenses.csv"),
            dir.path().join("data").join("expenses.xlsx"),
        )
    }

    fn ledger() -> Ledger {
        let d = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let table = Table::parse(vec![
            vec!["Date", "Category", "Amount", "Description"],
            vec!["2024-07-04", "Entertainment", "15", "fireworks"],
            vec!["bad date", "Other", "1.1", "  padded  "],
        ])
        .unwrap();
        let (ledger, _) = Ledger::from_table(&table).unwrap();
        assert_eq!(ledger.expenses()[0].date().date(), Some(d));
        ledger
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_path(Path::new("a.CSV")).unwrap(), FileKind::Csv);
        assert_eq!(
            FileKind::from_path(Path::new("a.xlsx")).unwrap(),
            FileKind::Spreadsheet
        );
        assert_eq!(
            FileKind::from_path(Path::new("a.xls")).unwrap(),
            FileKind::Spreadsheet
        );
        assert!(FileKind::from_path(Path::new("a.json")).is_err());
        assert!(FileKind::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        assert!(storage(&dir).load().unwrap().is_none());
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        std::fs::create_dir_all(storage.csv_path().parent().unwrap()).unwrap();
        std::fs::write(storage.csv_path(), "").unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        std::fs::create_dir_all(storage.csv_path().parent().unwrap()).unwrap();
        std::fs::write(storage.csv_path(), "Date,Amount\n2024-01-01,1\n").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_save_writes_identical_rows() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let ledger = ledger();
        storage.save(&ledger).unwrap();

        let from_csv = read_table(storage.csv_path()).unwrap();
        let from_xlsx = read_table(storage.xlsx_path()).unwrap();
        let (a, _) = Ledger::from_table(&from_csv).unwrap();
        let (b, _) = Ledger::from_table(&from_xlsx).unwrap();
        assert_eq!(a, ledger);
        assert_eq!(b, ledger);
        assert_eq!(b.expenses()[1].description(), "  padded  ");

        assert!(!utils::staging_path(storage.csv_path()).exists());
        assert!(!utils::staging_path(storage.xlsx_path()).exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let ledger = ledger();
        storage.save(&ledger).unwrap();
        assert_eq!(storage.load().unwrap(), Some(ledger));
    }

    #[test]
    fn test_failed_stage_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let good = storage(&dir);
        good.save(&ledger()).unwrap();
        let before = std::fs::read(good.csv_path()).unwrap();

        // The staging path of the xlsx file is a directory, so staging fails
        let blocked = dir.path().join("blocked.xlsx");
        std::fs::create_dir_all(utils::staging_path(&blocked)).unwrap();
        let bad = Storage::new(good.csv_path(), &blocked);

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let table = Table::parse(vec![
            vec!["Date", "Category", "Amount", "Description"],
            vec!["2024-01-01", "Food", "1", ""],
        ])
        .unwrap();
        let (other, _) = Ledger::from_table(&table).unwrap();
        assert_eq!(other.expenses(), &[Expense::new(date, "Food", dec!(1), "")]);
        assert!(bad.save(&other).is_err());

        assert_eq!(std::fs::read(good.csv_path()).unwrap(), before);
        assert!(!utils::staging_path(good.csv_path()).exists());
        assert!(!blocked.exists());
    }
}
