use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A priced ticket class for an event ("GA", "VIP", ...). The
/// `tickets_available` counter is the overbooking gate: decremented
/// inside the booking transaction, incremented back on cancellation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventReserve {
    pub event_reserve_id: i64,
    pub event_id: i64,
    pub reserve_name: String,
    pub reserve_description: Option<String>,
    pub cost: Decimal,
    pub tickets_available: i32,
}

/// Binding of a reserve to a venue section for one event instance,
/// with its own capacity counter (always <= the section's total_seats).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSection {
    pub event_section_id: i64,
    pub event_reserve_id: i64,
    pub venue_section_id: i64,
    pub tickets_available: i32,
}
