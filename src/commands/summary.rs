use crate::args::SummaryArgs;
use crate::budget::BudgetComparison;
use crate::commands::{open_store, resolve_range, today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::money;
use crate::summary::Summary;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Write;

/// The structured output of `budgetbuddy summary`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOut {
    pub summary: Summary,
    pub budget: BudgetComparison,
}

/// Totals the expenses inside the date range and compares the total with the budget.
///
/// The range defaults to the first of the current month through today.
pub fn summary(config: Config, args: SummaryArgs) -> Result<Out<SummaryOut>> {
    let store = open_store(&config)?;
    let range = resolve_range(args.range(), today());
    let summary =
        Summary::compute(store.ledger().expenses(), range).pub_result(ErrorType::Request)?;
    let budget = BudgetComparison::new(args.budget().value(), summary.total())
        .pub_result(ErrorType::Request)?;
    let message = render(&summary, &budget, config.currency());
    Ok(Out::new(message, SummaryOut { summary, budget }))
}

fn render(summary: &Summary, budget: &BudgetComparison, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary from {}", summary.range());
    let _ = writeln!(out, "Total Budget: {}", money(budget.budget(), currency));
    let _ = writeln!(out, "Total Amount Spent: {}", money(budget.spent(), currency));
    let _ = writeln!(out, "Remaining Budget: {}", money(budget.remaining(), currency));
    let _ = write!(out, "{}", budget.verdict(currency));
    if summary.skipped_invalid_dates() > 0 {
        let _ = write!(
            out,
            "\n{} expense(s) without a valid date were not counted",
            summary.skipped_invalid_dates()
        );
    }
    out
}
