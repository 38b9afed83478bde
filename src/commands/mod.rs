//! Command handlers for the budgetbuddy CLI.
//!
//! Each subcommand has one handler. A handler loads what it needs, does its work and returns an
//! `Out` that `main` prints.

mod add;
mod chart;
mod clear;
mod import;
mod init;
mod list;
mod save;
mod summary;

use crate::args::RangeArgs;
use crate::error::{ErrorType, IntoResult};
use crate::ledger::LedgerStore;
use crate::summary::DateRange;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

pub use add::add;
pub use chart::chart;
pub use clear::clear;
pub use import::import;
pub use init::init;
pub use list::list;
pub use save::save;
pub use summary::{summary, SummaryOut};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the configuration from `budgetbuddy_home`, which must have been created by `init`.
pub fn load_config(budgetbuddy_home: &Path) -> Result<Config> {
    Config::load(budgetbuddy_home).pub_result(ErrorType::Config)
}

/// Opens the ledger store described by `config`.
fn open_store(config: &Config) -> Result<LedgerStore> {
    LedgerStore::open(config.storage()).pub_result(ErrorType::Storage)
}

/// Fills in the missing ends of a range: the start defaults to the first of `today`'s month and
/// the end to `today`.
fn resolve_range(args: &RangeArgs, today: NaiveDate) -> DateRange {
    let default = DateRange::month_to_date(today);
    DateRange::new(
        args.start().unwrap_or(default.start()),
        args.end().unwrap_or(default.end()),
    )
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// "1 expense", "2 expenses"
fn expenses_noun(count: usize) -> String {
    format!("{count} expense{}", if count == 1 { "" } else { "s" })
}
