//! Spreadsheet encoding of expense tables. Reading goes through `calamine`, which understands
//! `xlsx`, `xlsm`, `xls` and `ods`; writing produces `xlsx` through `rust_xlsxwriter`.

use crate::error::Res;
use crate::model::{Expense, Table, DATE_FORMAT, EXPENSE_COLUMNS};
use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Data, Reader};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// The name of the single worksheet we write.
pub(crate) const SHEET_NAME: &str = "Expenses";

/// The number of data rows a worksheet can hold below its header row.
const MAX_ROWS: usize = 1_048_575;

/// Reads the first worksheet of the workbook at `path` into a raw `Table`.
pub(crate) fn read_table(path: &Path) -> Res<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Unable to open the workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("The workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("Unable to read the first worksheet of {}", path.display()))?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    Table::parse(rows)
}

/// Converts a spreadsheet cell to the text a CSV file would hold for it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.date().format(DATE_FORMAT).to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

/// Encodes the expenses as the bytes of an `xlsx` file with a bold header row.
pub(crate) fn encode(expenses: &[Expense]) -> Res<Vec<u8>> {
    if expenses.len() > MAX_ROWS {
        bail!(
            "{} expenses do not fit in a single worksheet",
            expenses.len()
        );
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("0.00");

    for (col, name) in EXPENSE_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (ix, expense) in expenses.iter().enumerate() {
        let row = ix as u32 + 1;
        let amount = expense.amount().rounded().value().to_f64().unwrap_or_default();
        worksheet.write_string(row, 0, expense.date().to_string())?;
        worksheet.write_string(row, 1, expense.category())?;
        worksheet.write_number_with_format(row, 2, amount, &amount_format)?;
        worksheet.write_string(row, 3, expense.description())?;
    }

    workbook
        .save_to_buffer()
        .context("Unable to encode expenses as xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_encode_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.xlsx");
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let expenses = vec![
            Expense::new(date, "Food", dec!(42.5), "lunch"),
            Expense::new(date, "Utilities", dec!(1234.56), ""),
        ];
        std::fs::write(&path, encode(&expenses).unwrap()).unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers(), &EXPENSE_COLUMNS);
        assert_eq!(table.rows()[0], vec!["2024-06-30", "Food", "42.5", "lunch"]);

        let (ledger, report) = Ledger::from_table(&table).unwrap();
        assert_eq!(ledger.expenses(), expenses.as_slice());
        assert!(report.invalid_dates.is_empty());
    }

    #[test]
    fn test_read_not_a_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "this is not a zip file").unwrap();
        assert!(read_table(&path).is_err());
    }
}
