use crate::commands::{expenses_noun, open_store, Out};
use crate::model::{Expense, EXPENSE_COLUMNS};
use crate::{Config, Result};
use std::fmt::Write;

/// Prints every expense in the ledger, in the order they were recorded.
pub fn list(config: Config) -> Result<Out<Vec<Expense>>> {
    let store = open_store(&config)?;
    let expenses = store.ledger().expenses().to_vec();
    if expenses.is_empty() {
        return Ok(Out::new("No expenses have been recorded", expenses));
    }
    let message = format!(
        "{}\n{}",
        render_table(&expenses),
        expenses_noun(expenses.len())
    );
    Ok(Out::new(message, expenses))
}

/// Lays the expenses out in aligned columns with the amount right-aligned.
fn render_table(expenses: &[Expense]) -> String {
    let rows: Vec<[String; 4]> = expenses.iter().map(Expense::to_row).collect();
    let mut widths = EXPENSE_COLUMNS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let [date_w, category_w, amount_w, _] = widths;

    let mut out = String::new();
    let [date, category, amount, description] = EXPENSE_COLUMNS;
    let _ = writeln!(
        out,
        "{date:<date_w$}  {category:<category_w$}  {amount:>amount_w$}  {description}"
    );
    for [date, category, amount, description] in &rows {
        let _ = writeln!(
            out,
            "{date:<date_w$}  {category:<category_w$}  {amount:>amount_w$}  {description}"
        );
    }
    out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_list_empty() {
        let env = TestEnv::new();
        let out = list(env.config()).unwrap();
        assert_eq!(out.message(), "No expenses have been recorded");
        assert!(out.structure().unwrap().is_empty());
    }

    #[test]
    fn test_list() {
        let env = TestEnv::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        env.add_expense(Expense::new(date, "Food", dec!(4.5), "bagel"));
        env.add_expense(Expense::new(date, "Entertainment", dec!(120), ""));

        let out = list(env.config()).unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(
            lines,
            vec![
                "Date        Category       Amount  Description",
                "2024-01-09  Food             4.50  bagel",
                "2024-01-09  Entertainment  120.00",
                "2 expenses",
            ]
        );
    }
}
