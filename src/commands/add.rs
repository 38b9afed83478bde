use crate::args::AddArgs;
use crate::commands::{open_store, today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Expense;
use crate::{Config, Result};

/// Appends one expense to the ledger and saves the snapshot.
///
/// The date defaults to today. The amount has already been checked to be zero or more by the
/// argument parser.
///
/// # Errors
/// - Returns an error if the snapshot cannot be loaded or saved.
pub fn add(config: Config, args: AddArgs) -> Result<Out<Expense>> {
    let mut store = open_store(&config)?;
    let expense = Expense::new(
        args.date().unwrap_or_else(today),
        args.category(),
        args.amount().rounded(),
        args.description(),
    );
    store
        .append(expense.clone())
        .pub_result(ErrorType::Storage)?;
    let message = format!(
        "Added {} {} expense on {}",
        expense.amount().to_money(config.currency()),
        expense.category(),
        expense.date()
    );
    Ok(Out::new(message, expense))
}
