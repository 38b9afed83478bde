use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file with default settings.
///
/// # Arguments
/// - `budgetbuddy_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/budgetbuddy`
///
/// # Errors
/// - Returns an error if any file operations fail.
/// - Returns an error if the directory already holds a `config.json`.
pub fn init(budgetbuddy_home: &Path) -> Result<Out<()>> {
    let config = Config::create(budgetbuddy_home)
        .context("Unable to create the data directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the budgetbuddy directory and config at {}",
        config.root().display()
    )
    .into())
}
