use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod dashboard {
    use std::collections::BTreeMap;

    /// `GET /total-sum`
    pub type TotalSum = f64;

    /// `GET /sum-by-type`
    pub type SumByType = BTreeMap<String, f64>;

    /// `GET /count-by-type`
    pub type CountByType = BTreeMap<String, u64>;

    /// `GET /count-total`
    pub type CountTotal = u64;

    /// `GET /balances`: positive values are owed to the participant,
    /// negative values are owed by them.
    pub type Balances = BTreeMap<String, f64>;

    /// `GET /settlement`: debtor to ordered payment instructions
    /// (`"pay <creditor> <amount>"`).
    pub type Settlement = BTreeMap<String, Vec<String>>;
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub username: String,
        pub category: String,
        pub description: Option<String>,
        pub amount: f64,
        pub paid_by: String,
        pub participants: Vec<ParticipantView>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub name: String,
        /// Fixed share; `None` when the participant is part of the equal
        /// split.
        pub share: Option<f64>,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
