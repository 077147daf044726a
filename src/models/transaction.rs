use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Append-only ledger row. One of `credit`/`debit` carries the amount,
/// the other is zero; `balance` is the user's balance after the
/// mutation. Never updated once written.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LedgerEntry {
    pub transaction_id: i64,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub credit: Decimal,
    pub debit: Decimal,
    pub balance: Decimal,
}
