//! The dashboard service.
//!
//! Every call loads the owner's expenses from the store and derives a fresh
//! result; nothing is cached between calls.

use std::collections::BTreeMap;

use crate::{
    Expense, ExpenseStore, MoneyCents, ResultEngine, Summary, Username,
    ledger::{self, Balances},
    settlement::{self, Instructions, Transfer},
};

#[derive(Debug)]
pub struct Dashboard<S> {
    store: S,
}

impl<S: ExpenseStore> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All expenses of `username`, oldest first.
    pub async fn expenses(&self, username: &Username) -> ResultEngine<Vec<Expense>> {
        self.store.find_expenses_by_user(username.as_str()).await
    }

    pub async fn summary(&self, username: &Username) -> ResultEngine<Summary> {
        let expenses = self.expenses(username).await?;
        Summary::from_expenses(&expenses)
    }

    pub async fn total_sum(&self, username: &Username) -> ResultEngine<MoneyCents> {
        Ok(self.summary(username).await?.total)
    }

    pub async fn sum_by_category(
        &self,
        username: &Username,
    ) -> ResultEngine<BTreeMap<String, MoneyCents>> {
        Ok(self.summary(username).await?.sum_by_category)
    }

    pub async fn count_by_category(
        &self,
        username: &Username,
    ) -> ResultEngine<BTreeMap<String, u64>> {
        Ok(self.summary(username).await?.count_by_category)
    }

    pub async fn count_total(&self, username: &Username) -> ResultEngine<u64> {
        Ok(self.summary(username).await?.count)
    }

    pub async fn net_balances(&self, username: &Username) -> ResultEngine<Balances> {
        let expenses = self.expenses(username).await?;
        ledger::net_balances(&expenses)
    }

    pub async fn transfers(&self, username: &Username) -> ResultEngine<Vec<Transfer>> {
        let balances = self.net_balances(username).await?;
        Ok(settlement::settle(&balances))
    }

    /// Payment instructions per debtor.
    pub async fn settlement(&self, username: &Username) -> ResultEngine<Instructions> {
        let transfers = self.transfers(username).await?;
        Ok(settlement::instructions(&transfers))
    }

    /// Removes every expense of `username`. Resetting an empty dashboard is a
    /// no-op.
    pub async fn reset(&self, username: &Username) -> ResultEngine<u64> {
        let deleted = self.store.delete_expenses_by_user(username.as_str()).await?;
        tracing::info!("reset dashboard {username}: {deleted} expenses deleted");
        Ok(deleted)
    }
}
