use serde::Serialize;
use sqlx::FromRow;

/// A physical section of a venue with a fixed seat count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VenueSection {
    pub section_id: i64,
    pub venue_id: i64,
    pub section_name: String,
    pub total_seats: i32,
}

/// An individual physical seat. Immutable catalog data; booking and
/// cancellation never touch these rows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VenueSeat {
    pub seat_id: i64,
    pub section_id: i64,
    pub seat_name: String,
    pub seat_number: i32,
}
