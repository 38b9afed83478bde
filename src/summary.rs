//! Read-only aggregates over a slice of expenses: range totals and per-category breakdowns.
//!
//! Nothing in here mutates a ledger. Records whose date is invalid never fall inside a range.

use crate::error::Res;
use crate::model::{Expense, DATE_FORMAT};
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// An inclusive pair of calendar dates.
///
/// The ordering of `start` and `end` is not validated; a reversed range simply contains no dates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The first day of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// The expenses whose date falls inside `range`.
pub fn filter<'a>(
    expenses: &'a [Expense],
    range: &'a DateRange,
) -> impl Iterator<Item = &'a Expense> + 'a {
    expenses
        .iter()
        .filter(move |e| e.date().date().is_some_and(|d| range.contains(d)))
}

/// The sum of all amounts dated inside `range`. Zero when nothing matches. Fails rather than
/// overflowing when the amounts are too large to add up.
pub fn range_total(expenses: &[Expense], range: &DateRange) -> Res<Decimal> {
    filter(expenses, range).try_fold(Decimal::ZERO, |total, e| add(total, e.amount().value()))
}

/// Sums the amounts dated inside `range` per category.
///
/// The key is the category text exactly as stored, so imported categories outside the fixed set
/// each get their own entry. The map is empty when nothing matches.
pub fn category_breakdown(
    expenses: &[Expense],
    range: &DateRange,
) -> Res<BTreeMap<String, Decimal>> {
    let mut breakdown = BTreeMap::new();
    for expense in filter(expenses, range) {
        let total = breakdown
            .entry(expense.category().to_string())
            .or_insert(Decimal::ZERO);
        *total = add(*total, expense.amount().value())
            .with_context(|| format!("Unable to total the category '{}'", expense.category()))?;
    }
    Ok(breakdown)
}

fn add(a: Decimal, b: Decimal) -> Res<Decimal> {
    a.checked_add(b)
        .with_context(|| format!("Adding {b} to {a} overflows"))
}

/// Everything the summary screen needs for one date range.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Summary {
    range: DateRange,
    total: Decimal,
    breakdown: BTreeMap<String, Decimal>,
    matched: usize,
    skipped_invalid_dates: usize,
}

impl Summary {
    pub fn compute(expenses: &[Expense], range: DateRange) -> Res<Self> {
        let matched = filter(expenses, &range).count();
        let skipped_invalid_dates = expenses.iter().filter(|e| !e.date().is_valid()).count();
        Ok(Self {
            total: range_total(expenses, &range)?,
            breakdown: category_breakdown(expenses, &range)?,
            range,
            matched,
            skipped_invalid_dates,
        })
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn breakdown(&self) -> &BTreeMap<String, Decimal> {
        &self.breakdown
    }

    /// The number of expenses inside the range.
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// The number of expenses left out of every range because their date could not be parsed.
    pub fn skipped_invalid_dates(&self) -> usize {
        self.skipped_invalid_dates
    }
}
