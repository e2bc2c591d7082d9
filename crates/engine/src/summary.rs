//! Dashboard totals and per-category breakdowns.

use std::collections::BTreeMap;

use crate::{EngineError, Expense, MoneyCents, ResultEngine};

/// Aggregated view over a list of expenses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: MoneyCents,
    pub count: u64,
    pub sum_by_category: BTreeMap<String, MoneyCents>,
    pub count_by_category: BTreeMap<String, u64>,
}

impl Summary {
    /// Folds `expenses` into totals. Fails with
    /// [`EngineError::AmountOverflow`] if a sum leaves the cents range.
    pub fn from_expenses(expenses: &[Expense]) -> ResultEngine<Self> {
        let mut summary = Self::default();
        for expense in expenses {
            summary.total = add_amount(summary.total, expense.amount, "total")?;
            let category_sum = summary
                .sum_by_category
                .entry(expense.category.clone())
                .or_default();
            *category_sum = add_amount(*category_sum, expense.amount, &expense.category)?;
            summary.count += 1;
            *summary
                .count_by_category
                .entry(expense.category.clone())
                .or_default() += 1;
        }
        Ok(summary)
    }
}

fn add_amount(sum: MoneyCents, amount: MoneyCents, what: &str) -> ResultEngine<MoneyCents> {
    sum.checked_add(amount)
        .ok_or_else(|| EngineError::AmountOverflow(format!("sum of {what} out of range")))
}
