use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::services::pricing::{self, ReferralInfo};
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

pub async fn create_referral(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(info): Json<ReferralInfo>,
) -> Result<Response, AppError> {
    pricing::create_referral(&state.pool, info, &user).await?;
    Ok(empty_success("Referral code created").into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiscountPayload {
    percentage_off: Decimal,
}

/// Customers look a code up before booking to see the discount it
/// carries. Inactive codes are reported as expired.
pub async fn get_referral_discount(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let percentage_off = pricing::get_referral_discount(&state.pool, &code).await?;
    Ok(success(DiscountPayload { percentage_off }, "Referral code retrieved").into_response())
}

pub async fn deactivate_referral(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    pricing::deactivate_referral(&state.pool, &code, &user).await?;
    Ok(empty_success("Referral code deactivated").into_response())
}

pub async fn reactivate_referral(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    pricing::reactivate_referral(&state.pool, &code, &user).await?;
    Ok(empty_success("Referral code reactivated").into_response())
}

pub async fn get_host_referrals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let referrals = pricing::get_host_referrals(&state.pool, &user).await?;
    Ok(success(referrals, "Referral codes retrieved").into_response())
}
