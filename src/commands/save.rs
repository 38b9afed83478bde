use crate::commands::{expenses_noun, open_store, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

/// Loads the ledger and writes it back to both snapshot files. This regenerates the XLSX copy
/// from the CSV file, e.g. after the CSV file was edited by hand.
pub fn save(config: Config) -> Result<Out<()>> {
    let store = open_store(&config)?;
    store.save().pub_result(ErrorType::Storage)?;
    Ok(format!(
        "Saved {} to {} and {}",
        expenses_noun(store.ledger().len()),
        config.csv_path().display(),
        config.xlsx_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_save_first_run() {
        let env = TestEnv::new();
        let out = save(env.config()).unwrap();
        assert!(out.message().starts_with("Saved 0 expenses to"));
        assert!(env.config().csv_path().is_file());
        assert!(env.config().xlsx_path().is_file());
        assert!(env.store().ledger().is_empty());
    }

    #[test]
    fn test_save_regenerates_xlsx() {
        let env = TestEnv::new();
        env.write_file(
            "expenses.csv",
            "Date,Category,Amount,Description\n2024-05-05,Food,3.00,tea\n",
        );
        save(env.config()).unwrap();
        let table = crate::storage::read_table(&env.config().xlsx_path()).unwrap();
        assert_eq!(table.rows(), &[vec!["2024-05-05", "Food", "3", "tea"]]);
    }
}
