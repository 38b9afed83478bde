pub mod args;
pub mod budget;
pub mod chart;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod storage;
pub mod summary;
mod utils;


pub use config::Config;
pub use error::{Error, ErrorType, Result, SchemaError};
pub use ledger::{ImportReport, Ledger, LedgerStore};
