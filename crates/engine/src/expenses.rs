//! Expense records.
//!
//! An [`Expense`] is paid by one person and shared by the participants listed
//! in its [`Share`]s. Amounts are stored as integer cents.
//!
//! Expenses are immutable once recorded; the dashboard only reads them and
//! deletes them in bulk on reset.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, Username, expense_shares, ledger,
    util::{normalize_optional_text, normalize_required_name},
};

/// One participant of an expense.
///
/// `amount` is a fixed share. When it is `None` the participant takes part in
/// the equal split of whatever the fixed shares leave over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant: String,
    pub amount: Option<MoneyCents>,
}

impl Share {
    /// A participant in the equal split.
    pub fn equal(participant: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            amount: None,
        }
    }

    /// A participant owing exactly `amount`.
    pub fn fixed(participant: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            participant: participant.into(),
            amount: Some(amount),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub username: String,
    pub category: String,
    pub description: Option<String>,
    pub amount: MoneyCents,
    pub paid_by: String,
    pub shares: Vec<Share>,
    pub created_at: DateTime<Utc>,
}

/// Largest amount a single expense may have. Keeps the totals of a dashboard
/// far inside the `i64` cents range.
pub const MAX_EXPENSE_AMOUNT: MoneyCents = MoneyCents::new(10_000_000_000_000);

/// Input for recording a new expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub username: String,
    pub category: String,
    pub description: Option<String>,
    pub amount: MoneyCents,
    pub paid_by: String,
    pub shares: Vec<Share>,
}

impl Expense {
    /// Validates `input` and turns it into a record stamped with `created_at`.
    ///
    /// Names are trimmed and NFC-normalized, the amount must be positive and
    /// the shares must split the amount exactly.
    pub fn new(input: NewExpense, created_at: DateTime<Utc>) -> ResultEngine<Self> {
        let username = Username::parse(&input.username)?;
        if !input.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        if input.amount > MAX_EXPENSE_AMOUNT {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be at most {MAX_EXPENSE_AMOUNT}"
            )));
        }

        let shares = input
            .shares
            .into_iter()
            .map(|share| {
                Ok(Share {
                    participant: normalize_required_name(&share.participant, "participant")?,
                    amount: share.amount,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        let expense = Self {
            // v7 ids sort in creation order, which breaks `created_at` ties.
            id: Uuid::now_v7(),
            username: username.as_str().to_string(),
            category: normalize_required_name(&input.category, "category")?,
            description: normalize_optional_text(input.description.as_deref()),
            amount: input.amount,
            paid_by: normalize_required_name(&input.paid_by, "payer")?,
            shares,
            created_at,
        };

        ledger::split_expense(&expense)?;
        Ok(expense)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    pub category: String,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub paid_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_shares::Entity")]
    Shares,
}

impl Related<super::expense_shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            username: ActiveValue::Set(expense.username.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            paid_by: ActiveValue::Set(expense.paid_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<(Model, Vec<expense_shares::Model>)> for Expense {
    type Error = EngineError;

    fn try_from(
        (model, mut shares): (Model, Vec<expense_shares::Model>),
    ) -> Result<Self, Self::Error> {
        shares.sort_by_key(|share| share.position);
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidExpense(format!("invalid id: {}", model.id)))?,
            username: model.username,
            category: model.category,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            paid_by: model.paid_by,
            shares: shares
                .into_iter()
                .map(|share| Share {
                    participant: share.participant,
                    amount: share.amount_minor.map(MoneyCents::new),
                })
                .collect(),
            created_at: model.created_at,
        })
    }
}
