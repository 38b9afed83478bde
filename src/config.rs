//! Configuration file handling for BudgetBuddy.
//!
//! The configuration file is stored at `$BUDGETBUDDY_HOME/config.json` and contains settings such
//! as the currency symbol and the locations of the two snapshot files.

use crate::error::Res;
use crate::storage::Storage;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "budgetbuddy";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const EXPENSES_CSV: &str = "expenses.csv";
const EXPENSES_XLSX: &str = "expenses.xlsx";
const CURRENCY: &str = "$";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGETBUDDY_HOME` and from there it loads `$BUDGETBUDDY_HOME/config.json`. It
/// provides paths to the snapshot files, which are either configured or expected in a certain
/// location within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json` file with default settings.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    /// - Returns an error if a `config.json` already exists in `dir`.
    pub fn create(dir: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).context("Unable to create the budgetbuddy home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let config_file = ConfigFile::default();
        config_file.save(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub fn load(home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The budgetbuddy home directory '{}' is missing, run 'budgetbuddy init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'budgetbuddy init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }

    /// The primary snapshot file.
    pub fn csv_path(&self) -> PathBuf {
        self.resolve(self.config_file.csv_path())
    }

    /// The spreadsheet copy of the snapshot.
    pub fn xlsx_path(&self) -> PathBuf {
        self.resolve(self.config_file.xlsx_path())
    }

    /// Creates a `Storage` for the configured snapshot files.
    pub fn storage(&self) -> Storage {
        Storage::new(self.csv_path(), self.xlsx_path())
    }

    /// Checks if `p` is relative, and if so, resolves it. Returns it unchanged if it is absolute.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budgetbuddy",
///   "config_version": 1,
///   "currency": "$",
///   "csv_path": "expenses.csv",
///   "xlsx_path": "/home/me/Documents/expenses.xlsx"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budgetbuddy"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The symbol printed in front of amounts
    #[serde(default = "default_currency")]
    currency: String,

    /// Path to the CSV snapshot (optional, relative to the home directory or absolute)
    /// Defaults to $BUDGETBUDDY_HOME/expenses.csv if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    csv_path: Option<PathBuf>,

    /// Path to the XLSX snapshot (optional, relative to the home directory or absolute)
    /// Defaults to $BUDGETBUDDY_HOME/expenses.xlsx if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    xlsx_path: Option<PathBuf>,
}

fn default_currency() -> String {
    CURRENCY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency: default_currency(),
            csv_path: None,
            xlsx_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }

    #[cfg(test)]
    pub fn new(currency: &str, csv_path: Option<PathBuf>, xlsx_path: Option<PathBuf>) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency: currency.to_string(),
            csv_path,
            xlsx_path,
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.csv_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(EXPENSES_CSV))
    }

    pub fn xlsx_path(&self) -> PathBuf {
        self.xlsx_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(EXPENSES_XLSX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("budgetbuddy_home");

        let config = Config::create(&home_dir).unwrap();

        assert!(config.config_path().is_file());
        assert_eq!(config.currency(), "$");
        assert_eq!(config.csv_path(), config.root().join("expenses.csv"));
        assert_eq!(config.xlsx_path(), config.root().join("expenses.xlsx"));
    }

    #[test]
    fn test_config_create_twice() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).unwrap();
        assert!(Config::create(dir.path()).is_err());
    }

    #[test]
    fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.storage(), loaded.storage());
    }

    #[test]
    fn test_config_load_missing() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("budgetbuddy init"));
        assert!(Config::load(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.currency, "$");
        assert_eq!(config.csv_path(), PathBuf::from(EXPENSES_CSV));
        assert_eq!(config.xlsx_path(), PathBuf::from(EXPENSES_XLSX));
    }

    #[test]
    fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original = ConfigFile::new(
            "€",
            Some(PathBuf::from("data/mine.csv")),
            Some(PathBuf::from("/tmp/mine.xlsx")),
        );
        original.save(&config_path).unwrap();
        let loaded = ConfigFile::load(&config_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_config_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).unwrap();
        ConfigFile::new(
            "$",
            Some(PathBuf::from("data/mine.csv")),
            Some(PathBuf::from("/abs/mine.xlsx")),
        )
        .save(config.config_path())
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.csv_path(), config.root().join("data/mine.csv"));
        assert_eq!(config.xlsx_path(), PathBuf::from("/abs/mine.xlsx"));
    }

    #[test]
    fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{ "app_name": "budgetbuddy", "config_version": 1 }"#,
        )
        .unwrap();

        let config = ConfigFile::load(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{ "app_name": "wrong_app", "config_version": 1 }"#,
        )
        .unwrap();

        let result = ConfigFile::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("csv_path"));
        assert!(!json.contains("xlsx_path"));
    }
}
