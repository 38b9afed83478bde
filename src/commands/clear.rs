use crate::commands::{expenses_noun, open_store, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

/// Deletes every expense and saves the empty ledger.
pub fn clear(config: Config) -> Result<Out<()>> {
    let mut store = open_store(&config)?;
    let removed = store.ledger().len();
    store.clear().pub_result(ErrorType::Storage)?;
    Ok(format!("All data has been cleared, removed {}", expenses_noun(removed)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expense;
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clear() {
        let env = TestEnv::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        env.add_expense(Expense::new(date, "Food", dec!(1), ""));
        env.add_expense(Expense::new(date, "Food", dec!(2), ""));

        let out = clear(env.config()).unwrap();
        assert_eq!(out.message(), "All data has been cleared, removed 2 expenses");
        assert!(env.store().ledger().is_empty());

        // The snapshot still has its header row
        let csv = std::fs::read_to_string(env.config().csv_path()).unwrap();
        assert_eq!(csv, "Date,Category,Amount,Description\n");
    }
}
