use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Aggregate root of a purchase. Cancellation is soft: the row is
/// retained with `cancelled = true` while its child rows are deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub booking_id: i64,
    pub event_id: i64,
    pub customer_id: i64,
    pub date: DateTime<Utc>,
    pub total_cost: Decimal,
    pub total_quantity: i32,
    pub referral_code: Option<String>,
    pub amount_saved: Decimal,
    pub cancelled: bool,
}

/// All tickets in a booking that belong to the same reserve, with the
/// unit cost snapshotted at booking time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingReserve {
    pub booking_reserve_id: i64,
    pub booking_id: i64,
    pub reserve_id: i64,
    pub quantity: i32,
    pub unit_cost: Decimal,
}

/// One physical seat sold under a booking reserve line.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SeatedTicket {
    pub ticket_id: i64,
    pub booking_reserve_id: i64,
    pub event_section_id: i64,
    pub seat_id: i64,
    pub seat_name: String,
}
