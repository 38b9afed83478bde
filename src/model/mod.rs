//! Types that represent the core data model, such as `Expense` and `Amount`.
mod amount;
mod category;
mod expense;
mod table;

pub use amount::{money, Amount, AmountError};
pub use category::Category;
pub use expense::{
    Expense, ExpenseDate, AMOUNT_STR, CATEGORY_STR, DATE_FORMAT, DATE_STR, DESCRIPTION_STR,
    EXPENSE_COLUMNS,
};
pub use table::Table;
