use crate::args::ImportArgs;
use crate::commands::{expenses_noun, open_store, Out};
use crate::error::{Error, ErrorType, IntoResult, SchemaError};
use crate::ledger::ImportReport;
use crate::model::AmountError;
use crate::storage;
use crate::{Config, Result};

/// Replaces the whole ledger with the rows of a CSV or spreadsheet file and saves the snapshot.
///
/// # Errors
/// - `ErrorType::Request` if the file type is not supported, the file cannot be read, or an
///   amount cannot be parsed.
/// - `ErrorType::Schema` if a required column is missing. The ledger is left unchanged.
/// - `ErrorType::Storage` if the snapshot cannot be loaded or saved.
pub fn import(config: Config, args: ImportArgs) -> Result<Out<ImportReport>> {
    let table = storage::read_table(args.file()).pub_result(ErrorType::Request)?;
    let mut store = open_store(&config)?;
    let report = store
        .import_replace(&table)
        .map_err(|e| Error::new(classify(&e), e))?;

    let mut message = format!(
        "Imported {} from {}",
        expenses_noun(report.rows),
        args.file().display()
    );
    if !report.invalid_dates.is_empty() {
        let lines: Vec<String> = report.invalid_dates.iter().map(|l| l.to_string()).collect();
        message.push_str(&format!(
            "\nRows with a date that could not be read are left out of summaries: line {}",
            lines.join(", ")
        ));
    }
    if !report.dropped_columns.is_empty() {
        message.push_str(&format!(
            "\nIgnored columns: {}",
            report.dropped_columns.join(", ")
        ));
    }
    Ok(Out::new(message, report))
}

fn classify(e: &anyhow::Error) -> ErrorType {
    if e.downcast_ref::<SchemaError>().is_some() {
        ErrorType::Schema
    } else if e.downcast_ref::<AmountError>().is_some() {
        ErrorType::Request
    } else {
        ErrorType::Storage
    }
}
