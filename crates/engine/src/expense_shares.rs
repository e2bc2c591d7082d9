//! Participants of an expense, one row per share.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::Share;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_shares")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    /// Order of the participant in the expense, starting at 0.
    pub position: i32,
    pub participant: String,
    pub amount_minor: Option<i64>,
}

impl Model {
    pub(crate) fn from_share(expense_id: Uuid, position: usize, share: &Share) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            expense_id: expense_id.to_string(),
            position: i32::try_from(position).unwrap_or(i32::MAX),
            participant: share.participant.clone(),
            amount_minor: share.amount.map(i64::from),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn into_insert_model(self) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id),
            expense_id: ActiveValue::Set(self.expense_id),
            position: ActiveValue::Set(self.position),
            participant: ActiveValue::Set(self.participant),
            amount_minor: ActiveValue::Set(self.amount_minor),
        }
    }
}
