//! Dashboard API endpoints.
//!
//! Every endpoint is scoped to the `{username}` path segment, which is
//! validated before the store is touched.

use api_types::{
    dashboard::{Balances, CountByType, CountTotal, Settlement, SumByType, TotalSum},
    expense::{ExpenseView, ParticipantView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Expense, ExpenseStore, Username};

use crate::{ServerError, server::ServerState};

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        username: expense.username,
        category: expense.category,
        description: expense.description,
        amount: expense.amount.as_f64(),
        paid_by: expense.paid_by,
        participants: expense
            .shares
            .into_iter()
            .map(|share| ParticipantView {
                name: share.participant,
                share: share.amount.map(|amount| amount.as_f64()),
            })
            .collect(),
        created_at: expense.created_at,
    }
}

pub async fn total_sum<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<TotalSum>, ServerError> {
    let username = Username::parse(&username)?;
    let total = state.dashboard.total_sum(&username).await?;
    Ok(Json(total.as_f64()))
}

pub async fn sum_by_type<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<SumByType>, ServerError> {
    let username = Username::parse(&username)?;
    let sums = state
        .dashboard
        .sum_by_category(&username)
        .await?
        .into_iter()
        .map(|(category, amount)| (category, amount.as_f64()))
        .collect();
    Ok(Json(sums))
}

pub async fn count_by_type<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<CountByType>, ServerError> {
    let username = Username::parse(&username)?;
    Ok(Json(state.dashboard.count_by_category(&username).await?))
}

pub async fn count_total<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<CountTotal>, ServerError> {
    let username = Username::parse(&username)?;
    Ok(Json(state.dashboard.count_total(&username).await?))
}

pub async fn balances<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<Balances>, ServerError> {
    let username = Username::parse(&username)?;
    let balances = state
        .dashboard
        .net_balances(&username)
        .await?
        .into_iter()
        .map(|(name, amount)| (name, amount.as_f64()))
        .collect();
    Ok(Json(balances))
}

pub async fn settlement<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<Settlement>, ServerError> {
    let username = Username::parse(&username)?;
    Ok(Json(state.dashboard.settlement(&username).await?))
}

pub async fn expenses<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let username = Username::parse(&username)?;
    let expenses = state
        .dashboard
        .expenses(&username)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn reset<S: ExpenseStore>(
    State(state): State<ServerState<S>>,
    Path(username): Path<String>,
) -> Result<StatusCode, ServerError> {
    let username = Username::parse(&username)?;
    state.dashboard.reset(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
