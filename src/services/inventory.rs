//! Ticket inventory: reserve- and section-level capacity counters plus
//! seat allocation for seated events.
//!
//! The counters are the overbooking gate. Both are read under
//! `SELECT ... FOR UPDATE` and mutated with conditional updates inside
//! the caller's transaction, so two concurrent bookings can never pass
//! the availability check against the same stale count. Counters are
//! symmetric: booking takes tickets, cancellation returns them.

use serde::Serialize;
use sqlx::{FromRow, PgConnection};

use crate::models::{Event, EventReserve, EventSection, VenueSeat};
use crate::utils::error::AppError;

pub async fn get_event(conn: &mut PgConnection, event_id: i64) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>(
        r#"SELECT event_id, host_id, title, event_type, venue_id, start_time, end_time, cancelled
           FROM events WHERE event_id = $1"#,
    )
    .bind(event_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event '{}' could not be found.", event_id)))
}

pub async fn get_event_reserves(
    conn: &mut PgConnection,
    event_id: i64,
) -> Result<Vec<EventReserve>, AppError> {
    let reserves = sqlx::query_as::<_, EventReserve>(
        r#"SELECT event_reserve_id, event_id, reserve_name, reserve_description, cost, tickets_available
           FROM event_reserves WHERE event_id = $1 ORDER BY event_reserve_id"#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(reserves)
}

/// Resolve a named reserve with its row locked for the rest of the
/// transaction. The availability check, the decrement and (for seated
/// events) the seat assignment all happen under this lock.
pub async fn get_event_reserve_for_update(
    conn: &mut PgConnection,
    event_id: i64,
    reserve_name: &str,
) -> Result<Option<EventReserve>, AppError> {
    let reserve = sqlx::query_as::<_, EventReserve>(
        r#"SELECT event_reserve_id, event_id, reserve_name, reserve_description, cost, tickets_available
           FROM event_reserves
           WHERE event_id = $1 AND reserve_name = $2
           FOR UPDATE"#,
    )
    .bind(event_id)
    .bind(reserve_name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(reserve)
}

pub async fn take_reserve_tickets(
    conn: &mut PgConnection,
    reserve_id: i64,
    quantity: i32,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"UPDATE event_reserves
           SET tickets_available = tickets_available - $1
           WHERE event_reserve_id = $2 AND tickets_available >= $1"#,
    )
    .bind(quantity)
    .bind(reserve_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        // Unreachable when the caller holds the row lock and has
        // already checked availability.
        return Err(AppError::Internal(format!(
            "inventory invariant violated: reserve {} short of {} tickets",
            reserve_id, quantity
        )));
    }
    Ok(())
}

pub async fn return_reserve_tickets(
    conn: &mut PgConnection,
    reserve_id: i64,
    quantity: i32,
) -> Result<(), AppError> {
    sqlx::query(
        r#"UPDATE event_reserves
           SET tickets_available = tickets_available + $1
           WHERE event_reserve_id = $2"#,
    )
    .bind(quantity)
    .bind(reserve_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Per-section availability joined with reserve pricing, for the
/// pre-booking view of seated events.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SectionAvailability {
    pub section_name: String,
    pub tickets_available: i32,
    pub cost: rust_decimal::Decimal,
    pub reserve_name: String,
    pub reserve_description: Option<String>,
}

pub async fn get_event_section_availability(
    conn: &mut PgConnection,
    event_id: i64,
) -> Result<Vec<SectionAvailability>, AppError> {
    let sections = sqlx::query_as::<_, SectionAvailability>(
        r#"SELECT vs.section_name, es.tickets_available, er.cost, er.reserve_name, er.reserve_description
           FROM event_sections es
           JOIN event_reserves er ON er.event_reserve_id = es.event_reserve_id
           JOIN venue_sections vs ON vs.section_id = es.venue_section_id
           WHERE er.event_id = $1
           ORDER BY es.event_section_id"#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(sections)
}

/// Resolve the per-event section record by venue section name, locking
/// it for the duration of the transaction.
pub async fn get_event_section_for_update(
    conn: &mut PgConnection,
    event_reserve_id: i64,
    section_name: &str,
) -> Result<Option<EventSection>, AppError> {
    let section = sqlx::query_as::<_, EventSection>(
        r#"SELECT es.event_section_id, es.event_reserve_id, es.venue_section_id, es.tickets_available
           FROM event_sections es
           JOIN venue_sections vs ON vs.section_id = es.venue_section_id
           WHERE es.event_reserve_id = $1 AND vs.section_name = $2
           FOR UPDATE OF es"#,
    )
    .bind(event_reserve_id)
    .bind(section_name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(section)
}

pub async fn take_section_tickets(
    conn: &mut PgConnection,
    event_section_id: i64,
    quantity: i32,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"UPDATE event_sections
           SET tickets_available = tickets_available - $1
           WHERE event_section_id = $2 AND tickets_available >= $1"#,
    )
    .bind(quantity)
    .bind(event_section_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Internal(format!(
            "inventory invariant violated: section {} short of {} tickets",
            event_section_id, quantity
        )));
    }
    Ok(())
}

pub async fn return_section_tickets(
    conn: &mut PgConnection,
    event_section_id: i64,
    quantity: i32,
) -> Result<(), AppError> {
    sqlx::query(
        r#"UPDATE event_sections
           SET tickets_available = tickets_available + $1
           WHERE event_section_id = $2"#,
    )
    .bind(quantity)
    .bind(event_section_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// First-fit seat assignment: the set difference between a venue
/// section's seats and the seats already ticketed under the event
/// section, lowest seat id first. The counters are the capacity gate;
/// an empty difference despite available tickets is a consistency
/// failure surfaced to the caller.
pub async fn first_available_seat(
    conn: &mut PgConnection,
    venue_section_id: i64,
    event_section_id: i64,
) -> Result<VenueSeat, AppError> {
    let seat = sqlx::query_as::<_, VenueSeat>(
        r#"SELECT seat_id, section_id, seat_name, seat_number
           FROM venue_seats
           WHERE section_id = $1
             AND seat_id NOT IN (
                 SELECT seat_id FROM seated_tickets WHERE event_section_id = $2
             )
           ORDER BY seat_id
           LIMIT 1"#,
    )
    .bind(venue_section_id)
    .bind(event_section_id)
    .fetch_optional(&mut *conn)
    .await?;

    seat.ok_or_else(|| {
        AppError::InvalidInput("Event section does not have any available seats.".to_string())
    })
}

/// Persist one seated ticket. Capacity was already taken from the
/// section counter; this only records which physical seat was chosen.
pub async fn commit_seat(
    conn: &mut PgConnection,
    seat: &VenueSeat,
    booking_reserve_id: i64,
    event_section_id: i64,
) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO seated_tickets (booking_reserve_id, event_section_id, seat_id, seat_name)
           VALUES ($1, $2, $3, $4)"#,
    )
    .bind(booking_reserve_id)
    .bind(event_section_id)
    .bind(seat.seat_id)
    .bind(&seat.seat_name)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// How many seats a booking reserve line holds in each event section.
/// Read before the tickets are deleted so cancellation can hand the
/// capacity back to the right section counters.
pub async fn section_seat_counts(
    conn: &mut PgConnection,
    booking_reserve_id: i64,
) -> Result<Vec<(i64, i64)>, AppError> {
    let counts = sqlx::query_as::<_, (i64, i64)>(
        r#"SELECT event_section_id, COUNT(*)
           FROM seated_tickets
           WHERE booking_reserve_id = $1
           GROUP BY event_section_id"#,
    )
    .bind(booking_reserve_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(counts)
}

pub async fn release_seats(
    conn: &mut PgConnection,
    booking_reserve_id: i64,
) -> Result<(), AppError> {
    sqlx::query(r#"DELETE FROM seated_tickets WHERE booking_reserve_id = $1"#)
        .bind(booking_reserve_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn release_booking_reserves(
    conn: &mut PgConnection,
    booking_id: i64,
) -> Result<(), AppError> {
    sqlx::query(r#"DELETE FROM booking_reserves WHERE booking_id = $1"#)
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
