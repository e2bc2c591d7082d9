//! Expense-splitting dashboard engine.
//!
//! The engine reads the expenses of a dashboard owner through an
//! [`ExpenseStore`] and derives totals, per-category breakdowns, net balances
//! and a settlement plan from them. All amounts are integer cents
//! ([`MoneyCents`]).

pub use dashboard::Dashboard;
pub use error::EngineError;
pub use expenses::{Expense, MAX_EXPENSE_AMOUNT, NewExpense, Share};
pub use ledger::{Balances, net_balances, split_expense};
pub use money::MoneyCents;
pub use settlement::{Instructions, Transfer, instructions, settle};
pub use store::{DatabaseStore, ExpenseStore};
pub use summary::Summary;
pub use username::Username;

mod dashboard;
mod error;
mod expense_shares;
mod expenses;
mod ledger;
mod money;
mod settlement;
mod store;
mod summary;
mod username;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
