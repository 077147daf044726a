use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// One row per host per day; booking credits and cancellation debits
/// accumulate onto the same row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HostDailySales {
    pub host_id: i64,
    pub date: NaiveDate,
    pub sales: Decimal,
}

/// Ticket-count deltas per (host, reserve, day). Negative deltas come
/// from cancellations.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventReserveSales {
    pub host_id: i64,
    pub event_id: i64,
    pub reserve_id: i64,
    pub date: NaiveDate,
    pub sales: i32,
}
