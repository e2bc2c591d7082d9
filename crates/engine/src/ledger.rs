//! Net balances derived from expenses.
//!
//! Every expense credits its payer with the full amount and debits each
//! participant by their share, so the balances of a ledger always sum to
//! exactly zero.

use std::collections::BTreeMap;

use crate::{EngineError, Expense, MoneyCents, ResultEngine};

/// Net balance per participant: positive is owed money, negative owes money.
pub type Balances = BTreeMap<String, MoneyCents>;

/// Splits an expense into what each participant owes, in listed order.
///
/// Fixed shares are taken as-is. The rest of the amount is divided equally
/// among participants without a fixed share; leftover cents go one each to
/// the first of those participants. An expense without participants is borne
/// by its payer.
pub fn split_expense(expense: &Expense) -> ResultEngine<Vec<(String, MoneyCents)>> {
    if !expense.amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "expense {} has a non-positive amount",
            expense.id
        )));
    }

    if expense.shares.is_empty() {
        return Ok(vec![(expense.paid_by.clone(), expense.amount)]);
    }

    let mut fixed_total = MoneyCents::ZERO;
    let mut equal_count = 0i64;
    for share in &expense.shares {
        match share.amount {
            Some(amount) if amount.is_negative() => {
                return Err(EngineError::InvalidExpense(format!(
                    "negative share for {}",
                    share.participant
                )));
            }
            Some(amount) => {
                fixed_total = fixed_total.checked_add(amount).ok_or_else(|| {
                    EngineError::InvalidExpense("shares too large".to_string())
                })?;
            }
            None => equal_count += 1,
        }
    }

    if fixed_total > expense.amount {
        return Err(EngineError::InvalidExpense(format!(
            "shares ({fixed_total}) exceed the amount ({})",
            expense.amount
        )));
    }

    let remainder = expense.amount - fixed_total;
    if equal_count == 0 && !remainder.is_zero() {
        return Err(EngineError::InvalidExpense(format!(
            "shares ({fixed_total}) do not add up to the amount ({})",
            expense.amount
        )));
    }

    let (base, mut leftover) = if equal_count > 0 {
        (remainder.cents() / equal_count, remainder.cents() % equal_count)
    } else {
        (0, 0)
    };

    Ok(expense
        .shares
        .iter()
        .map(|share| {
            let owed = share.amount.unwrap_or_else(|| {
                let mut cents = base;
                if leftover > 0 {
                    cents += 1;
                    leftover -= 1;
                }
                MoneyCents::new(cents)
            });
            (share.participant.clone(), owed)
        })
        .collect())
}

/// Accumulates the net balance of every payer and participant.
pub fn net_balances(expenses: &[Expense]) -> ResultEngine<Balances> {
    let mut balances = Balances::new();
    for expense in expenses {
        let paid = balances.entry(expense.paid_by.clone()).or_default();
        *paid = paid
            .checked_add(expense.amount)
            .ok_or_else(|| overflow(&expense.paid_by))?;
        for (participant, owed) in split_expense(expense)? {
            let balance = balances.entry(participant).or_default();
            *balance = balance
                .checked_sub(owed)
                .ok_or_else(|| overflow(&expense.paid_by))?;
        }
    }

    debug_assert_eq!(
        balances
            .values()
            .map(|balance| i128::from(balance.cents()))
            .sum::<i128>(),
        0
    );
    Ok(balances)
}

fn overflow(name: &str) -> EngineError {
    EngineError::AmountOverflow(format!("balance involving {name} out of range"))
}
