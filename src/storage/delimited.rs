//! CSV encoding of expense tables.

use crate::error::Res;
use crate::model::{Expense, Table, EXPENSE_COLUMNS};
use anyhow::Context;
use std::io::{Read, Write};

/// Reads CSV text into a raw `Table`. Ragged rows are accepted here; the `Table` decides what to
/// do with them. Cells are kept as written so that padded descriptions survive a reload.
pub(crate) fn read_table<R: Read>(reader: R) -> Res<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (ix, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Unable to read CSV line {}", ix + 1))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Table::parse(rows)
}

/// Writes the header and one row per expense.
pub(crate) fn write_expenses<W: Write>(writer: W, expenses: &[Expense]) -> Res<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPENSE_COLUMNS)?;
    for expense in expenses {
        wtr.write_record(expense.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Encodes the expenses as CSV bytes.
pub(crate) fn encode(expenses: &[Expense]) -> Res<Vec<u8>> {
    let mut buf = Vec::new();
    write_expenses(&mut buf, expenses).context("Unable to encode expenses as CSV")?;
    Ok(buf)
}
