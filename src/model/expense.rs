use crate::model::Amount;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DATE_STR: &str = "Date";
pub const CATEGORY_STR: &str = "Category";
pub const AMOUNT_STR: &str = "Amount";
pub const DESCRIPTION_STR: &str = "Description";

/// The header of every expense table, in the order the columns are written.
pub const EXPENSE_COLUMNS: [&str; 4] = [DATE_STR, CATEGORY_STR, AMOUNT_STR, DESCRIPTION_STR];

/// The format in which dates are written.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// The date of an expense.
///
/// Imported files are parsed tolerantly: text that cannot be read as a date becomes `Invalid`,
/// holding on to the original text so that it survives a save, instead of failing the import.
/// An invalid date never falls inside a date range.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseDate {
    Valid(NaiveDate),
    Invalid(String),
}

impl ExpenseDate {
    /// Parses `s` into a calendar date. Date-times are truncated to their date.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return ExpenseDate::Valid(date);
            }
        }
        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return ExpenseDate::Valid(datetime.date());
            }
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return ExpenseDate::Valid(datetime.date_naive());
        }
        ExpenseDate::Invalid(s.to_string())
    }

    /// The calendar date, if valid.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ExpenseDate::Valid(date) => Some(*date),
            ExpenseDate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ExpenseDate::Valid(_))
    }
}

impl Display for ExpenseDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseDate::Valid(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            ExpenseDate::Invalid(raw) => f.write_str(raw),
        }
    }
}

impl From<NaiveDate> for ExpenseDate {
    fn from(value: NaiveDate) -> Self {
        ExpenseDate::Valid(value)
    }
}

/// A single expense entry.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    date: ExpenseDate,
    category: String,
    amount: Amount,
    description: String,
}

impl Expense {
    pub fn new(
        date: impl Into<ExpenseDate>,
        category: impl Into<String>,
        amount: impl Into<Amount>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into().rounded(),
            description: description.into(),
        }
    }

    pub fn date(&self) -> &ExpenseDate {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The cell values in `EXPENSE_COLUMNS` order, as they are written to a CSV file.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.date.to_string(),
            self.category.clone(),
            self.amount.to_string(),
            self.description.clone(),
        ]
    }
}
