//! Settlement plans.
//!
//! A plan is built greedily: the largest debtor pays the largest creditor as
//! much as either can absorb, until nobody is owed anything. Ties on amount
//! are broken by name so the same balances always give the same plan.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{MoneyCents, ledger::Balances};

/// A single payment from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: MoneyCents,
}

impl Transfer {
    /// Human readable instruction for the debtor, e.g. `pay A 10`.
    pub fn instruction(&self) -> String {
        format!("pay {} {}", self.to, self.amount)
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

/// Instructions grouped by debtor, in the order the transfers were planned.
pub type Instructions = BTreeMap<String, Vec<String>>;

/// Computes the transfers that bring every balance back to zero.
pub fn settle(balances: &Balances) -> Vec<Transfer> {
    let mut creditors: Vec<(String, MoneyCents)> = balances
        .iter()
        .filter(|(_, amount)| amount.is_positive())
        .map(|(name, amount)| (name.clone(), *amount))
        .collect();
    let mut debtors: Vec<(String, MoneyCents)> = balances
        .iter()
        .filter(|(_, amount)| amount.is_negative())
        .map(|(name, amount)| (name.clone(), amount.abs()))
        .collect();

    let mut transfers = Vec::new();
    while let (Some(ci), Some(di)) = (largest(&creditors), largest(&debtors)) {
        let amount = creditors[ci].1.min(debtors[di].1);
        transfers.push(Transfer {
            from: debtors[di].0.clone(),
            to: creditors[ci].0.clone(),
            amount,
        });

        creditors[ci].1 -= amount;
        debtors[di].1 -= amount;
        if creditors[ci].1.is_zero() {
            creditors.swap_remove(ci);
        }
        if debtors[di].1.is_zero() {
            debtors.swap_remove(di);
        }
    }

    transfers
}

/// Groups transfers by debtor and renders them as instructions.
pub fn instructions(transfers: &[Transfer]) -> Instructions {
    let mut grouped = Instructions::new();
    for transfer in transfers {
        grouped
            .entry(transfer.from.clone())
            .or_default()
            .push(transfer.instruction());
    }
    grouped
}

// Largest amount first, then the alphabetically smallest name.
fn largest(parties: &[(String, MoneyCents)]) -> Option<usize> {
    parties
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, i64)]) -> Balances {
        entries
            .iter()
            .map(|(name, cents)| (name.to_string(), MoneyCents::new(*cents)))
            .collect()
    }

    fn apply(balances: &Balances, transfers: &[Transfer]) -> Balances {
        let mut after = balances.clone();
        for transfer in transfers {
            *after.entry(transfer.from.clone()).or_default() += transfer.amount;
            *after.entry(transfer.to.clone()).or_default() -= transfer.amount;
        }
        after
    }

    #[test]
    fn one_creditor_two_debtors() {
        let input = balances(&[("A", 2000), ("B", -1000), ("C", -1000)]);
        let transfers = settle(&input);
        let plan = instructions(&transfers);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan["B"], vec!["pay A 10".to_string()]);
        assert_eq!(plan["C"], vec!["pay A 10".to_string()]);
    }

    #[test]
    fn ties_are_broken_by_name() {
        let input = balances(&[("Z", 500), ("Y", 500), ("B", -500), ("A", -500)]);
        let transfers = settle(&input);
        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: "A".to_string(),
                    to: "Y".to_string(),
                    amount: MoneyCents::new(500),
                },
                Transfer {
                    from: "B".to_string(),
                    to: "Z".to_string(),
                    amount: MoneyCents::new(500),
                },
            ]
        );
    }

    #[test]
    fn largest_debtor_pays_largest_creditor_first() {
        let input = balances(&[("A", 700), ("B", 300), ("C", -950), ("D", -50)]);
        let transfers = settle(&input);
        let plan = instructions(&transfers);

        assert_eq!(
            plan["C"],
            vec!["pay A 7".to_string(), "pay B 2.50".to_string()]
        );
        assert_eq!(plan["D"], vec!["pay B 0.50".to_string()]);
    }

    #[test]
    fn settled_ledger_needs_no_transfers() {
        assert!(settle(&balances(&[("A", 0), ("B", 0)])).is_empty());
        assert!(settle(&Balances::new()).is_empty());
    }

    #[test]
    fn applying_the_plan_zeroes_every_balance() {
        let cases = [
            balances(&[("A", 2000), ("B", -1000), ("C", -1000)]),
            balances(&[("A", 1), ("B", 1), ("C", -2)]),
            balances(&[("ann", 12345), ("bob", -3333), ("cat", -4444), ("dan", -4568)]),
            balances(&[("a", -7), ("b", 3), ("c", -1), ("d", 9), ("e", -4)]),
        ];

        for input in cases {
            let transfers = settle(&input);
            assert!(transfers.len() < input.len().max(1));
            let after = apply(&input, &transfers);
            assert!(after.values().all(|amount| amount.is_zero()), "{after:?}");
        }
    }
}
