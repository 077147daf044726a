//! Self-service wallet operations: deposits, withdrawals and the
//! transaction history page. Balance mutations go through the ledger
//! so every movement leaves an entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::constants::MAX_BALANCE;
use crate::models::{LedgerEntry, User};
use crate::services::ledger;
use crate::utils::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsRequest {
    #[serde(default)]
    pub start: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub balance: Decimal,
}

pub async fn deposit(pool: &PgPool, user: &User, amount: Decimal) -> Result<BalanceView, AppError> {
    validate_amount(amount)?;

    let mut tx = pool.begin().await?;

    // Row lock so two concurrent deposits cannot both pass the cap
    // check against the same pre-credit balance.
    let current = ledger::get_user_for_update(&mut tx, user.user_id).await?;

    if current.balance + amount > MAX_BALANCE {
        return Err(AppError::ForbiddenAction(format!(
            "User cannot store more than ${} in their balance.",
            MAX_BALANCE
        )));
    }

    ledger::credit(&mut tx, &current, amount, "Deposit", "wallet").await?;
    let balance = current.balance + amount;

    tx.commit().await?;

    tracing::info!(user_id = user.user_id, %amount, "Deposit completed");

    Ok(BalanceView { balance })
}

pub async fn withdraw(pool: &PgPool, user: &User, amount: Decimal) -> Result<BalanceView, AppError> {
    validate_amount(amount)?;

    let mut tx = pool.begin().await?;

    let current = ledger::get_user_for_update(&mut tx, user.user_id).await?;

    if amount > current.balance {
        return Err(AppError::InvalidInput(
            "Cannot withdraw more than the user's balance.".to_string(),
        ));
    }

    ledger::debit(&mut tx, &current, amount, "Withdrawal", "wallet").await?;
    let balance = current.balance - amount;

    tx.commit().await?;

    tracing::info!(user_id = user.user_id, %amount, "Withdrawal completed");

    Ok(BalanceView { balance })
}

pub async fn transactions(
    pool: &PgPool,
    user: &User,
    start: Option<i64>,
) -> Result<Vec<LedgerEntry>, AppError> {
    ledger::recent_transactions(pool, user.user_id, start.unwrap_or(0)).await
}

fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "Amount must be positive.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(Decimal::new(-100, 2)).is_err());
        assert!(validate_amount(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_max_balance_is_one_hundred_million() {
        assert_eq!(MAX_BALANCE, Decimal::from(100_000_000i64));
    }
}
