//! The balance ledger: a denormalized per-user balance plus an
//! append-only transaction log. Every mutation goes through `credit`
//! or `debit`; nothing else writes `users.balance`.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::constants::PAGE_SIZE;
use crate::models::{LedgerEntry, User};
use crate::services::analytics;
use crate::utils::error::AppError;

pub async fn get_user(conn: &mut PgConnection, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"SELECT user_id, username, email, role, org_name, balance
           FROM users WHERE user_id = $1"#,
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User '{}' could not be found.", user_id)))
}

/// Like `get_user`, but locks the row for the rest of the transaction.
/// Any balance check that precedes a credit or debit must read through
/// this, the same discipline the inventory counters use: a concurrent
/// mutation blocks on the lock instead of racing the check.
pub async fn get_user_for_update(
    conn: &mut PgConnection,
    user_id: i64,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"SELECT user_id, username, email, role, org_name, balance
           FROM users WHERE user_id = $1
           FOR UPDATE"#,
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User '{}' could not be found.", user_id)))
}

/// Add funds. Appends the transaction row with the post-mutation
/// balance snapshot; host credits also accumulate into daily sales
/// within the same transaction.
pub async fn credit(
    conn: &mut PgConnection,
    user: &User,
    amount: Decimal,
    action: &str,
    item: &str,
) -> Result<(), AppError> {
    let new_balance: Decimal =
        sqlx::query_scalar(r#"UPDATE users SET balance = balance + $1 WHERE user_id = $2 RETURNING balance"#)
            .bind(amount)
            .bind(user.user_id)
            .fetch_one(&mut *conn)
            .await?;

    let description = format!("Credit ${}: {} for {}.", amount.round_dp(2), action, item);
    log_entry(conn, user.user_id, amount, Decimal::ZERO, new_balance, &description).await?;

    if user.is_host() {
        analytics::log_daily_sales(conn, user.user_id, amount).await?;
    }

    Ok(())
}

/// Remove funds. Callers pre-check sufficiency; the conditional update
/// here is the backstop, and tripping it means a caller skipped the
/// check. That is a logic error, never a user-facing response.
pub async fn debit(
    conn: &mut PgConnection,
    user: &User,
    amount: Decimal,
    action: &str,
    item: &str,
) -> Result<(), AppError> {
    let new_balance: Option<Decimal> = sqlx::query_scalar(
        r#"UPDATE users SET balance = balance - $1
           WHERE user_id = $2 AND balance >= $1
           RETURNING balance"#,
    )
    .bind(amount)
    .bind(user.user_id)
    .fetch_optional(&mut *conn)
    .await?;

    let new_balance = new_balance.ok_or_else(|| {
        AppError::Internal(format!(
            "ledger invariant violated: debit of {} would overdraw user {}",
            amount, user.user_id
        ))
    })?;

    let description = format!("Debit ${}: {} for {}.", amount.round_dp(2), action, item);
    log_entry(conn, user.user_id, Decimal::ZERO, amount, new_balance, &description).await?;

    if user.is_host() {
        analytics::log_daily_sales(conn, user.user_id, -amount).await?;
    }

    Ok(())
}

async fn log_entry(
    conn: &mut PgConnection,
    user_id: i64,
    credit: Decimal,
    debit: Decimal,
    balance: Decimal,
    description: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO transactions (user_id, date, description, credit, debit, balance)
           VALUES ($1, now(), $2, $3, $4, $5)"#,
    )
    .bind(user_id)
    .bind(description)
    .bind(credit)
    .bind(debit)
    .bind(balance)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Most recent transactions first, one page at a time.
pub async fn recent_transactions(
    pool: &PgPool,
    user_id: i64,
    start: i64,
) -> Result<Vec<LedgerEntry>, AppError> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        r#"SELECT transaction_id, user_id, date, description, credit, debit, balance
           FROM transactions
           WHERE user_id = $1
           ORDER BY date DESC, transaction_id DESC
           LIMIT $2 OFFSET $3"#,
    )
    .bind(user_id)
    .bind(PAGE_SIZE)
    .bind(start.max(0))
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
