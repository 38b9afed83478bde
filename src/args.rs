//! These structs provide the CLI interface for the budgetbuddy CLI.

use crate::model::{Amount, Category, DATE_FORMAT};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budgetbuddy: A command-line tool for tracking personal expenses.
///
/// Record dated, categorized expenses, import them from CSV or spreadsheet files, and see how your
/// spending over a date range compares with a budget. Every change is saved right away to a CSV
/// file and an XLSX copy of it in the budgetbuddy home directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/budgetbuddy; pass --budgetbuddy-home or set BUDGETBUDDY_HOME to put it elsewhere.
    Init,
    /// Record a single expense.
    Add(AddArgs),
    /// Replace all expenses with the contents of a .csv, .xlsx or .xls file.
    ///
    /// The file must have the columns Date, Category, Amount and Description. Any other columns
    /// are dropped. If a required column is missing nothing is changed.
    Import(ImportArgs),
    /// Write the expenses to the CSV and XLSX files again.
    Save,
    /// Delete all expenses.
    Clear,
    /// Print all expenses.
    List,
    /// Show spending for a date range compared with a budget.
    Summary(SummaryArgs),
    /// Draw a bar chart of spending per category for a date range.
    Chart(ChartArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter docs.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budgetbuddy data and configuration is held. Defaults to ~/budgetbuddy
    #[arg(long, env = "BUDGETBUDDY_HOME", default_value_t = default_budgetbuddy_home())]
    budgetbuddy_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budgetbuddy_home: PathBuf) -> Self {
        Self {
            log_level,
            budgetbuddy_home: budgetbuddy_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budgetbuddy_home(&self) -> &DisplayPath {
        &self.budgetbuddy_home
    }
}

/// Args for the `budgetbuddy add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The kind of expense.
    #[arg(long, value_enum)]
    category: Category,

    /// How much was spent, zero or more. Rounded to cents.
    #[arg(long, value_parser = parse_non_negative)]
    amount: Amount,

    /// The day of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// A free-form note.
    #[arg(long, default_value = "")]
    description: String,
}

impl AddArgs {
    pub fn new(
        category: Category,
        amount: impl Into<Amount>,
        date: Option<NaiveDate>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            amount: amount.into(),
            date,
            description: description.into(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Args for the `budgetbuddy import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The file to import. The extension decides how it is read.
    file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// A start and end date, both optional on the command line. Missing ends default to the first of
/// the current month and today.
#[derive(Debug, Parser, Clone, Default)]
pub struct RangeArgs {
    /// The first day of the range as YYYY-MM-DD, inclusive.
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// The last day of the range as YYYY-MM-DD, inclusive.
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,
}

impl RangeArgs {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

/// Args for the `budgetbuddy summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    range: RangeArgs,

    /// The total budget for the range.
    #[arg(long, value_parser = parse_non_negative, default_value = "0.00")]
    budget: Amount,
}

impl SummaryArgs {
    pub fn new(range: RangeArgs, budget: impl Into<Amount>) -> Self {
        Self {
            range,
            budget: budget.into(),
        }
    }

    pub fn range(&self) -> &RangeArgs {
        &self.range
    }

    pub fn budget(&self) -> Amount {
        self.budget
    }
}

/// Args for the `budgetbuddy chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    #[clap(flatten)]
    range: RangeArgs,

    /// The length of the longest bar in characters.
    #[arg(long, default_value_t = 40)]
    width: usize,
}

impl ChartArgs {
    pub fn new(range: RangeArgs, width: usize) -> Self {
        Self { range, width }
    }

    pub fn range(&self) -> &RangeArgs {
        &self.range
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Parses an amount that must not be below zero and rounds it to cents.
fn parse_non_negative(s: &str) -> Result<Amount, String> {
    let amount = Amount::from_str(s).map_err(|e| e.to_string())?;
    if amount.is_negative() {
        return Err(format!("'{s}' is below zero"));
    }
    Ok(amount.rounded())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| format!("'{s}' is not a YYYY-MM-DD date: {e}"))
}

fn default_budgetbuddy_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budgetbuddy"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budgetbuddy-home or BUDGETBUDDY_HOME instead of relying on \
                the default home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("budgetbuddy")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
