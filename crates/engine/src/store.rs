//! Expense persistence.
//!
//! The dashboard only needs two things from storage: every expense of a
//! dashboard owner, and a way to drop them all. [`ExpenseStore`] captures that
//! contract; [`DatabaseStore`] implements it on top of sea-orm.

use std::{collections::HashMap, future::Future};

use chrono::Utc;
use sea_orm::{
    DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, QueryTrait, TransactionTrait,
    prelude::*,
};

use crate::{Expense, NewExpense, ResultEngine, expense_shares, expenses};

/// Collaborator supplying and removing expense records.
pub trait ExpenseStore: Send + Sync {
    /// Every expense recorded for `username`, oldest first. Unknown users have
    /// no expenses.
    fn find_expenses_by_user(
        &self,
        username: &str,
    ) -> impl Future<Output = ResultEngine<Vec<Expense>>> + Send;

    /// Deletes every expense of `username` and returns how many were removed.
    fn delete_expenses_by_user(
        &self,
        username: &str,
    ) -> impl Future<Output = ResultEngine<u64>> + Send;
}

#[derive(Clone, Debug)]
pub struct DatabaseStore {
    database: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Validates and stores a new expense together with its shares.
    pub async fn record_expense(&self, input: NewExpense) -> ResultEngine<Expense> {
        let expense = Expense::new(input, Utc::now())?;

        let db_tx = self.database.begin().await?;
        expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
        for (position, share) in expense.shares.iter().enumerate() {
            expense_shares::Model::from_share(expense.id, position, share)
                .into_insert_model()
                .insert(&db_tx)
                .await?;
        }
        db_tx.commit().await?;

        tracing::debug!(
            "recorded expense {} for {} ({} participants)",
            expense.id,
            expense.username,
            expense.shares.len()
        );
        Ok(expense)
    }
}

impl ExpenseStore for DatabaseStore {
    async fn find_expenses_by_user(&self, username: &str) -> ResultEngine<Vec<Expense>> {
        let models: Vec<expenses::Model> = expenses::Entity::find()
            .filter(expenses::Column::Username.eq(username))
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let share_models: Vec<expense_shares::Model> = expense_shares::Entity::find()
            .inner_join(expenses::Entity)
            .filter(expenses::Column::Username.eq(username))
            .all(&self.database)
            .await?;

        let mut shares_by_expense: HashMap<String, Vec<expense_shares::Model>> = HashMap::new();
        for share in share_models {
            shares_by_expense
                .entry(share.expense_id.clone())
                .or_default()
                .push(share);
        }

        models
            .into_iter()
            .map(|model| {
                let shares = shares_by_expense.remove(&model.id).unwrap_or_default();
                Expense::try_from((model, shares))
            })
            .collect()
    }

    async fn delete_expenses_by_user(&self, username: &str) -> ResultEngine<u64> {
        let db_tx = self.database.begin().await?;

        let owned_ids = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Id)
            .filter(expenses::Column::Username.eq(username))
            .into_query();
        expense_shares::Entity::delete_many()
            .filter(expense_shares::Column::ExpenseId.in_subquery(owned_ids))
            .exec(&db_tx)
            .await?;
        let deleted = expenses::Entity::delete_many()
            .filter(expenses::Column::Username.eq(username))
            .exec(&db_tx)
            .await?;

        db_tx.commit().await?;
        Ok(deleted.rows_affected)
    }
}
