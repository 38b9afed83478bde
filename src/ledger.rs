//! The ledger is the ordered list of expenses for a session, and `LedgerStore` is its owner: every
//! mutation goes through the store, which writes a durable snapshot right after it.

use crate::error::Res;
use crate::model::{Amount, Expense, ExpenseDate, Table, EXPENSE_COLUMNS};
use crate::storage::Storage;
use crate::summary::{self, DateRange};
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// An ordered collection of expenses. Insertion order is preserved and duplicates are allowed.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from a raw table, checking the schema and typing every cell.
    ///
    /// - Fails with a `SchemaError` when any of `Date`, `Category`, `Amount`, `Description` is
    ///   missing or appears more than once.
    /// - Dates that cannot be parsed are kept as `ExpenseDate::Invalid` and reported.
    /// - An amount that cannot be parsed fails the whole table.
    /// - Columns other than the four above are dropped.
    pub fn from_table(table: &Table) -> Res<(Self, ImportReport)> {
        let [date_ix, category_ix, amount_ix, description_ix] =
            table.require_columns(EXPENSE_COLUMNS)?;

        let mut report = ImportReport {
            dropped_columns: table.extra_columns(&EXPENSE_COLUMNS),
            ..ImportReport::default()
        };

        let mut expenses = Vec::with_capacity(table.len());
        for (row_ix, row) in table.rows().iter().enumerate() {
            // The header is line 1 of the file
            let line = row_ix + 2;
            let date = ExpenseDate::parse(&row[date_ix]);
            if !date.is_valid() {
                warn!("Row {line}: unable to parse '{}' as a date", row[date_ix]);
                report.invalid_dates.push(line);
            }
            let amount = Amount::from_str(&row[amount_ix])
                .with_context(|| format!("Unable to read the Amount on row {line}"))?;
            if amount.is_negative() {
                report.negative_amounts += 1;
            }
            expenses.push(Expense::new(
                date,
                row[category_ix].trim(),
                amount,
                row[description_ix].as_str(),
            ));
        }
        report.rows = expenses.len();

        if !report.dropped_columns.is_empty() {
            debug!("Dropped extra columns: {}", report.dropped_columns.join(", "));
        }
        if report.negative_amounts > 0 {
            warn!(
                "{} expense(s) have a negative amount",
                report.negative_amounts
            );
        }

        Ok((Self { expenses }, report))
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// The sum of all amounts dated inside `range`, inclusive.
    pub fn range_total(&self, range: &DateRange) -> Res<Decimal> {
        summary::range_total(&self.expenses, range)
    }

    /// Per-category sums of the amounts dated inside `range`, inclusive.
    pub fn category_breakdown(&self, range: &DateRange) -> Res<BTreeMap<String, Decimal>> {
        summary::category_breakdown(&self.expenses, range)
    }

    fn push(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

}

/// What happened during an import.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ImportReport {
    /// The number of expenses now in the ledger.
    pub rows: usize,
    /// File line numbers (the header is line 1) whose date could not be parsed.
    pub invalid_dates: Vec<usize>,
    /// Columns of the source table that are not part of the expense schema.
    pub dropped_columns: Vec<String>,
    /// The number of expenses with an amount below zero.
    pub negative_amounts: usize,
}

/// Owns the ledger for one session and keeps the snapshot files in step with it.
#[derive(Debug)]
pub struct LedgerStore {
    ledger: Ledger,
    storage: Storage,
}

impl LedgerStore {
    /// Loads the most recent snapshot from `storage`. When there is none, this is a first run and
    /// the store starts out empty.
    pub fn open(storage: Storage) -> Res<Self> {
        let ledger = match storage.load()? {
            Some(ledger) => {
                debug!("Loaded {} expense(s)", ledger.len());
                ledger
            }
            None => {
                debug!(
                    "No snapshot found at {}, starting with an empty ledger",
                    storage.csv_path().display()
                );
                Ledger::new()
            }
        };
        Ok(Self { ledger, storage })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Adds `expense` to the end of the ledger and saves.
    pub fn append(&mut self, expense: Expense) -> Res<()> {
        let mut next = self.ledger.clone();
        next.push(expense);
        self.commit(next)
    }

    /// Replaces the whole ledger with the contents of `table` and saves. If the table does not
    /// conform to the schema the ledger is left exactly as it was and nothing is written.
    pub fn import_replace(&mut self, table: &Table) -> Res<ImportReport> {
        let (ledger, report) = Ledger::from_table(table)?;
        self.commit(ledger)?;
        info!("Imported {} expense(s)", report.rows);
        Ok(report)
    }

    /// Removes every expense and saves the empty ledger.
    pub fn clear(&mut self) -> Res<()> {
        self.commit(Ledger::new())
    }

    /// Writes the current ledger to both snapshot files.
    pub fn save(&self) -> Res<()> {
        self.storage
            .save(&self.ledger)
            .context("Unable to save the expenses")
    }

    /// Saves `ledger` and only then makes it the current ledger, so a failed save changes nothing.
    fn commit(&mut self, ledger: Ledger) -> Res<()> {
        self.storage
            .save(&ledger)
            .context("Unable to save the expenses")?;
        self.ledger = ledger;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store(dir: &TempDir) -> LedgerStore {
        let storage = Storage::new(
            dir.path().join("expenses.csv"),
            dir.path().join("expenses.xlsx"),
        );
        LedgerStore::open(storage).unwrap()
    }

    fn seeded(dir: &TempDir) -> LedgerStore {
        let mut store = store(dir);
        store
            .append(Expense::new(ymd(2024, 3, 1), "Food", dec!(10), "groceries"))
            .unwrap();
        store
            .append(Expense::new(ymd(2024, 3, 2), "Transport", dec!(3), "bus"))
            .unwrap();
        store
    }

    #[test]
    fn test_open_without_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn test_append() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded(&dir);
        let before = store.ledger().len();
        let expense = Expense::new(ymd(2024, 3, 3), "Utilities", dec!(99.99), "");
        store.append(expense.clone()).unwrap();
        assert_eq!(store.ledger().len(), before + 1);
        assert_eq!(store.ledger().expenses().last(), Some(&expense));
        assert!(store.storage().csv_path().is_file());
        assert!(store.storage().xlsx_path().is_file());
    }

    #[test]
    fn test_append_allows_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let expense = Expense::new(ymd(2024, 3, 3), "Food", dec!(1), "");
        store.append(expense.clone()).unwrap();
        store.append(expense).unwrap();
        assert_eq!(store.ledger().len(), 2);
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded(&dir);
        store.clear().unwrap();
        assert_eq!(store.ledger().len(), 0);

        let reopened = self::store(&dir);
        assert_eq!(reopened.ledger().len(), 0);
    }

    #[test]
    fn test_import_missing_amount() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded(&dir);
        let before = store.ledger().clone();
        let csv_before = std::fs::read(store.storage().csv_path()).unwrap();

        let table = Table::parse(vec![
            vec!["Date", "Category", "Description"],
            vec!["2024-01-01", "Food", "x"],
        ])
        .unwrap();
        let err = store.import_replace(&table).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().unwrap();
        assert_eq!(schema.missing(), &["Amount"]);

        assert_eq!(store.ledger(), &before);
        assert_eq!(std::fs::read(store.storage().csv_path()).unwrap(), csv_before);
    }

    #[test]
    fn test_import_drops_extra_columns() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded(&dir);
        let table = Table::parse(vec![
            vec!["Account", "Date", "Amount", "Category", "Description", "Notes"],
            vec!["checking", "2024-05-01", "12.30", "Books", "novel", "gift"],
        ])
        .unwrap();
        let report = store.import_replace(&table).unwrap();
        assert_eq!(report.rows, 1);
        assert_eq!(report.dropped_columns, vec!["Account", "Notes"]);
        assert_eq!(
            store.ledger().expenses(),
            &[Expense::new(ymd(2024, 5, 1), "Books", dec!(12.30), "novel")]
        );

        let header = std::fs::read_to_string(store.storage().csv_path()).unwrap();
        assert!(header.starts_with("Date,Category,Amount,Description\n"));
    }

    #[test]
    fn test_import_keeps_invalid_dates() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let table = Table::parse(vec![
            vec!["Date", "Category", "Amount", "Description"],
            vec!["2024-05-01", "Food", "1", ""],
            vec!["not a date", "Food", "2", ""],
            vec!["2024-05-03", "Food", "-4", "refund"],
        ])
        .unwrap();
        let report = store.import_replace(&table).unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.invalid_dates, vec![3]);
        assert_eq!(report.negative_amounts, 1);
        assert!(!store.ledger().expenses()[1].date().is_valid());

        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 12, 31));
        assert_eq!(store.ledger().range_total(&range).unwrap(), dec!(-3));
    }

    #[test]
    fn test_import_bad_amount_leaves_ledger() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded(&dir);
        let before = store.ledger().clone();
        let table = Table::parse(vec![
            vec!["Date", "Category", "Amount", "Description"],
            vec!["2024-05-01", "Food", "ten", ""],
        ])
        .unwrap();
        let err = store.import_replace(&table).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
        assert_eq!(store.ledger(), &before);
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let expenses = vec![
            Expense::new(ymd(2024, 1, 31), "Food", dec!(42.50), "lunch, with friends"),
            Expense::new(ymd(2024, 2, 1), "Entertainment", dec!(0), "  padded note  "),
            Expense::new(ymd(2024, 2, 29), "Utilities", dec!(1234.56), "power \"bill\""),
        ];
        for e in &expenses {
            store.append(e.clone()).unwrap();
        }

        let reloaded = self::store(&dir);
        assert_eq!(reloaded.ledger().expenses(), expenses.as_slice());
    }

    #[test]
    fn test_ledger_queries() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir);
        let range = DateRange::new(ymd(2024, 3, 1), ymd(2024, 3, 1));
        assert_eq!(store.ledger().range_total(&range).unwrap(), dec!(10));
        assert_eq!(store.ledger().category_breakdown(&range).unwrap().len(), 1);
    }

    #[test]
    fn test_import_rounds_like_the_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let table = Table::parse(vec![
            vec!["Date", "Category", "Amount", "Description"],
            vec!["2024-05-01", "Food", "12.345", ""],
        ])
        .unwrap();
        store.import_replace(&table).unwrap();
        let range = DateRange::new(ymd(2024, 5, 1), ymd(2024, 5, 1));
        assert_eq!(store.ledger().range_total(&range).unwrap(), dec!(12.35));

        let reloaded = self::store(&dir);
        assert_eq!(reloaded.ledger(), store.ledger());
        assert_eq!(reloaded.ledger().range_total(&range).unwrap(), dec!(12.35));
    }

    #[test]
    fn test_failed_save_keeps_ledger() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir);
        let before = store.ledger().clone();

        // Block the staging path of the xlsx file so every save fails
        let blocked = dir.path().join("blocked.xlsx");
        std::fs::create_dir_all(crate::utils::staging_path(&blocked)).unwrap();
        let mut store = LedgerStore {
            ledger: store.ledger.clone(),
            storage: Storage::new(store.storage().csv_path(), &blocked),
        };

        let expense = Expense::new(ymd(2024, 3, 9), "Food", dec!(1), "");
        assert!(store.append(expense).is_err());
        assert_eq!(store.ledger(), &before);

        let table = Table::parse(vec![
            vec!["Date", "Category", "Amount", "Description"],
            vec!["2024-05-01", "Food", "1", ""],
        ])
        .unwrap();
        assert!(store.import_replace(&table).is_err());
        assert_eq!(store.ledger(), &before);

        assert!(store.clear().is_err());
        assert_eq!(store.ledger(), &before);
    }
}
