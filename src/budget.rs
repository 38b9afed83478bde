use crate::error::Res;
use crate::model::money;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;

/// Whether spending stayed within the budget.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum BudgetStatus {
    WithinBudget { remaining: Decimal },
    OverBudget { overage: Decimal },
}

/// A total budget compared with what was spent in the same period.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct BudgetComparison {
    budget: Decimal,
    spent: Decimal,
    remaining: Decimal,
}

impl BudgetComparison {
    /// Fails when `budget - spent` does not fit in a `Decimal`.
    pub fn new(budget: Decimal, spent: Decimal) -> Res<Self> {
        let remaining = budget
            .checked_sub(spent)
            .with_context(|| format!("Unable to subtract {spent} from the budget of {budget}"))?;
        Ok(Self {
            budget,
            spent,
            remaining,
        })
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn spent(&self) -> Decimal {
        self.spent
    }

    /// `budget - spent`, negative when over budget.
    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    pub fn status(&self) -> BudgetStatus {
        if self.remaining >= Decimal::ZERO {
            BudgetStatus::WithinBudget {
                remaining: self.remaining,
            }
        } else {
            BudgetStatus::OverBudget {
                overage: self.remaining.abs(),
            }
        }
    }

    /// The one-line verdict shown under the summary.
    pub fn verdict(&self, currency: &str) -> String {
        match self.status() {
            BudgetStatus::WithinBudget { remaining } => format!(
                "You are within budget! {} remaining.",
                money(remaining, currency)
            ),
            BudgetStatus::OverBudget { overage } => format!(
                "You have exceeded your budget by {}.",
                money(overage, currency)
            ),
        }
    }
}
