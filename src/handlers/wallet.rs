use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::services::wallet::{self, AmountRequest, TransactionsRequest};
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn deposit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AmountRequest>,
) -> Result<Response, AppError> {
    let balance = wallet::deposit(&state.pool, &user, request.amount).await?;
    Ok(success(balance, "Deposit successful").into_response())
}

pub async fn withdraw(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AmountRequest>,
) -> Result<Response, AppError> {
    let balance = wallet::withdraw(&state.pool, &user, request.amount).await?;
    Ok(success(balance, "Withdrawal successful").into_response())
}

pub async fn transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<TransactionsRequest>,
) -> Result<Response, AppError> {
    let entries = wallet::transactions(&state.pool, &user, request.start).await?;
    Ok(success(entries, "Transactions retrieved").into_response())
}
