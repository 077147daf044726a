//! Sales analytics recorder. Passive observer of bookings and
//! cancellations; rows accumulate per day via atomic upserts so
//! concurrent writers on the same day land on one row. These writes
//! run inside the booking/cancellation transaction: sales figures are
//! required to stay consistent with bookings, unlike notifications.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::utils::error::AppError;

/// Accumulate a signed dollar amount onto the host's row for today.
pub async fn log_daily_sales(
    conn: &mut PgConnection,
    host_id: i64,
    amount: Decimal,
) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO host_daily_sales (host_id, date, sales)
           VALUES ($1, $2, $3)
           ON CONFLICT (host_id, date)
           DO UPDATE SET sales = host_daily_sales.sales + EXCLUDED.sales"#,
    )
    .bind(host_id)
    .bind(Utc::now().date_naive())
    .bind(amount)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Accumulate a signed ticket-count delta onto the per-reserve row for
/// today. Cancellations log negative deltas.
pub async fn log_event_reserve_sales(
    conn: &mut PgConnection,
    event_id: i64,
    reserve_id: i64,
    num_tickets: i32,
    host_id: i64,
) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO event_sales (host_id, event_id, reserve_id, date, sales)
           VALUES ($1, $2, $3, $4, $5)
           ON CONFLICT (host_id, reserve_id, date)
           DO UPDATE SET sales = event_sales.sales + EXCLUDED.sales"#,
    )
    .bind(host_id)
    .bind(event_id)
    .bind(reserve_id)
    .bind(Utc::now().date_naive())
    .bind(num_tickets)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
