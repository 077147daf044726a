//! The booking orchestrator: validates a request against inventory,
//! prices it, moves funds through the ledger, persists the booking
//! aggregate and assigns seats — all inside one transaction, so a
//! failure at any step leaves nothing behind. Cancellation runs the
//! same sequence in reverse inside its own transaction.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::constants::{BOOKING_CUTOFF_DAYS, MAX_TICKETS_PER_BOOKING, PAGE_SIZE};
use crate::models::{Booking, BookingReserve, Event, User};
use crate::services::{analytics, inventory, ledger, pricing};
use crate::utils::email::{self, EmailMessage};
use crate::utils::error::AppError;

// --- Requests ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeBookingRequest {
    pub reserves: Vec<ReserveLineRequest>,
    #[serde(default)]
    pub referral_code: Option<String>,
    pub event_listing_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveLineRequest {
    pub reserve_name: String,
    pub quantity: i32,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub searchstr: Option<String>,
    #[serde(default)]
    pub start: Option<i64>,
}

// --- Views ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPreview {
    pub event_listing_id: i64,
    pub title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub cancelled: bool,
}

impl From<&Event> for EventPreview {
    fn from(event: &Event) -> Self {
        EventPreview {
            event_listing_id: event.event_id,
            title: event.title.clone(),
            event_type: event.event_type.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            cancelled: event.cancelled,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReserveView {
    pub reserve: String,
    pub tickets: i32,
    pub cost: Decimal,
    pub description: Option<String>,
    pub seats: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub booking_id: i64,
    pub cancelled: bool,
    pub booking_date: DateTime<Utc>,
    pub event_id: i64,
    pub total_cost: Decimal,
    pub total_quantity: i32,
    pub referral_code: Option<String>,
    pub amount_saved: Decimal,
    pub percentage_off: Decimal,
    pub reserves: Vec<BookingReserveView>,
    pub event_info: EventPreview,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservePreBookingInfo {
    pub reserve_name: String,
    pub tickets_left: i32,
    pub cost: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPreBookingInfo {
    pub section_name: String,
    pub tickets_left: i32,
    pub cost: Decimal,
    pub reserve: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreBookingInfo {
    pub event_info: EventPreview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_seated: Option<Vec<ReservePreBookingInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seated: Option<Vec<SectionPreBookingInfo>>,
}

/// A validated reserve line, with everything later steps need cached
/// so no gate is re-evaluated after its counter has been taken.
struct PendingReserve {
    reserve_id: i64,
    quantity: i32,
    unit_cost: Decimal,
    /// (event_section_id, venue_section_id) for seated events.
    section: Option<(i64, i64)>,
}

// --- Make booking ---

pub async fn make_booking(
    pool: &PgPool,
    request: MakeBookingRequest,
    user: &User,
) -> Result<i64, AppError> {
    if user.is_host() {
        return Err(AppError::ForbiddenAction(
            "Host accounts cannot book tickets.".to_string(),
        ));
    }

    if request.reserves.is_empty() {
        return Err(AppError::InvalidInput(
            "Booking must request at least one reserve.".to_string(),
        ));
    }

    for line in &request.reserves {
        if line.quantity <= 0 {
            return Err(AppError::InvalidInput(
                "Ticket quantity must be positive.".to_string(),
            ));
        }
    }

    let mut tx = pool.begin().await?;

    let event = inventory::get_event(&mut tx, request.event_listing_id).await?;

    if event.cancelled {
        return Err(AppError::InvalidInput(
            "Event has been cancelled.".to_string(),
        ));
    }

    if Utc::now() > event.start_time {
        return Err(AppError::InvalidInput(
            "Unable to book. Event has already started.".to_string(),
        ));
    }

    let seated = event.is_seated();
    let mut total_cost = Decimal::ZERO;
    let mut total_quantity = 0i32;
    let mut pending = Vec::with_capacity(request.reserves.len());

    for line in &request.reserves {
        let reserve =
            inventory::get_event_reserve_for_update(&mut tx, event.event_id, &line.reserve_name)
                .await?
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Event '{}' does not have reserve '{}'.",
                        event.title, line.reserve_name
                    ))
                })?;

        if reserve.tickets_available == 0 {
            return Err(AppError::InvalidInput(format!(
                "Could not book tickets. Reserve '{}' is sold out.",
                line.reserve_name
            )));
        }

        if reserve.tickets_available < line.quantity {
            return Err(AppError::InvalidInput(format!(
                "Could not book {} '{}' tickets. Reserve only has {} remaining.",
                line.quantity, line.reserve_name, reserve.tickets_available
            )));
        }

        let section = if seated {
            let section_name = line
                .section
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput(
                        "Booking Section cannot be empty for seated events.".to_string(),
                    )
                })?;

            let section = inventory::get_event_section_for_update(
                &mut tx,
                reserve.event_reserve_id,
                section_name,
            )
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Could not find venue section '{}'.", section_name))
            })?;

            if section.tickets_available == 0 {
                return Err(AppError::InvalidInput(format!(
                    "Could not book tickets. Event Section '{}' is sold out.",
                    section_name
                )));
            }

            if section.tickets_available < line.quantity {
                return Err(AppError::InvalidInput(format!(
                    "Could not book {} tickets in section {}. Section only has {} remaining.",
                    line.quantity, section_name, section.tickets_available
                )));
            }

            inventory::take_section_tickets(&mut tx, section.event_section_id, line.quantity)
                .await?;
            Some((section.event_section_id, section.venue_section_id))
        } else {
            None
        };

        inventory::take_reserve_tickets(&mut tx, reserve.event_reserve_id, line.quantity).await?;

        total_cost += reserve.cost * Decimal::from(line.quantity);
        total_quantity += line.quantity;
        pending.push(PendingReserve {
            reserve_id: reserve.event_reserve_id,
            quantity: line.quantity,
            unit_cost: reserve.cost,
            section,
        });
    }

    if total_quantity > MAX_TICKETS_PER_BOOKING {
        return Err(AppError::InvalidInput(format!(
            "User can only book a maximum of {} tickets.",
            MAX_TICKETS_PER_BOOKING
        )));
    }

    let priced =
        pricing::apply_discount_and_referral_fee(&mut tx, request.referral_code.as_deref(), total_cost)
            .await?;

    // Lock the customer's row for the funds check; a withdrawal racing
    // this read would otherwise trip the debit backstop instead of
    // being rejected as insufficient funds.
    let customer = ledger::get_user_for_update(&mut tx, user.user_id).await?;
    if priced.final_cost > customer.balance {
        return Err(AppError::InsufficientFunds(
            "User does not have enough funds.".to_string(),
        ));
    }

    let host = ledger::get_user(&mut tx, event.host_id).await?;

    ledger::debit(&mut tx, &customer, priced.final_cost, "Booking deduction", &event.title).await?;
    ledger::credit(&mut tx, &host, priced.host_cut, "Booking deposit", &event.title).await?;

    let booking_id: i64 = sqlx::query_scalar(
        r#"INSERT INTO bookings
               (event_id, customer_id, date, total_cost, total_quantity, referral_code, amount_saved, cancelled)
           VALUES ($1, $2, now(), $3, $4, $5, $6, FALSE)
           RETURNING booking_id"#,
    )
    .bind(event.event_id)
    .bind(customer.user_id)
    .bind(priced.final_cost)
    .bind(total_quantity)
    .bind(priced.referral_code.as_deref())
    .bind(total_cost - priced.final_cost)
    .fetch_one(&mut *tx)
    .await?;

    for line in &pending {
        let booking_reserve_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO booking_reserves (booking_id, reserve_id, quantity, unit_cost)
               VALUES ($1, $2, $3, $4)
               RETURNING booking_reserve_id"#,
        )
        .bind(booking_id)
        .bind(line.reserve_id)
        .bind(line.quantity)
        .bind(line.unit_cost)
        .fetch_one(&mut *tx)
        .await?;

        analytics::log_event_reserve_sales(
            &mut tx,
            event.event_id,
            line.reserve_id,
            line.quantity,
            event.host_id,
        )
        .await?;

        // One-seat-at-a-time first-fit assignment. Exclusivity comes
        // from the section row lock held since validation, not from
        // the algorithm itself.
        if let Some((event_section_id, venue_section_id)) = line.section {
            for _ in 0..line.quantity {
                let seat =
                    inventory::first_available_seat(&mut tx, venue_section_id, event_section_id)
                        .await?;
                inventory::commit_seat(&mut tx, &seat, booking_reserve_id, event_section_id)
                    .await?;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        booking_id,
        event_id = event.event_id,
        customer_id = customer.user_id,
        total_quantity,
        "Booking created"
    );

    email::dispatch(confirmation_email(&customer.email, &event, total_cost, total_quantity));

    Ok(booking_id)
}

// --- Cancel booking ---

pub async fn cancel_booking(
    pool: &PgPool,
    booking_id: i64,
    user: &User,
    event_cancellation: bool,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    // Row lock makes the cancelled check-and-set atomic; a booking
    // mid-cancellation elsewhere blocks here and then fails the
    // already-cancelled gate.
    let booking = get_booking_for_update(&mut tx, booking_id).await?;

    if booking.customer_id != user.user_id {
        return Err(AppError::ForbiddenAccess(format!(
            "User '{}' does not have access to this booking.",
            user.username
        )));
    }

    if booking.cancelled {
        return Err(AppError::InvalidInput(
            "Booking has already been cancelled.".to_string(),
        ));
    }

    let event = inventory::get_event(&mut tx, booking.event_id).await?;

    if !event_cancellation {
        let cutoff = Utc::now() + Duration::days(BOOKING_CUTOFF_DAYS);
        if cutoff > event.start_time {
            return Err(AppError::InvalidInput(format!(
                "Cannot cancel booking within {} days of event.",
                BOOKING_CUTOFF_DAYS
            )));
        }
    }

    let lines = get_booking_reserves(&mut tx, booking.booking_id).await?;

    for line in &lines {
        // Hand seat capacity back to the section counters before the
        // ticket rows disappear.
        for (event_section_id, seats) in
            inventory::section_seat_counts(&mut tx, line.booking_reserve_id).await?
        {
            inventory::return_section_tickets(&mut tx, event_section_id, seats as i32).await?;
        }
        inventory::release_seats(&mut tx, line.booking_reserve_id).await?;
        inventory::return_reserve_tickets(&mut tx, line.reserve_id, line.quantity).await?;

        analytics::log_event_reserve_sales(
            &mut tx,
            booking.event_id,
            line.reserve_id,
            -line.quantity,
            event.host_id,
        )
        .await?;
    }

    inventory::release_booking_reserves(&mut tx, booking.booking_id).await?;

    sqlx::query(r#"UPDATE bookings SET cancelled = TRUE WHERE booking_id = $1"#)
        .bind(booking.booking_id)
        .execute(&mut *tx)
        .await?;

    let host_amount = pricing::refund_referral_fee(
        &mut tx,
        booking.referral_code.as_deref(),
        booking.total_cost,
    )
    .await?;

    let host = ledger::get_user(&mut tx, event.host_id).await?;
    ledger::debit(&mut tx, &host, host_amount, "Cancellation deduction", &event.title).await?;
    ledger::credit(&mut tx, user, booking.total_cost, "Cancellation refund", &event.title).await?;

    tx.commit().await?;

    tracing::info!(
        booking_id = booking.booking_id,
        event_id = booking.event_id,
        event_cancellation,
        "Booking cancelled"
    );

    email::dispatch(cancellation_email(&user.email, &event, &booking));

    Ok(())
}

// --- Event-level cancellation cascade ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancellationOutcome {
    pub booking_id: i64,
    pub outcome: CancellationOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "message")]
pub enum CancellationOutcome {
    Cancelled,
    Failed(String),
}

/// Cancel every live booking of an event (host deletes the event).
///
/// Each booking is cancelled in its own transaction and reported as a
/// per-booking outcome. A cutoff violation aborts the whole cascade —
/// the event cannot be deleted this close to its start — while any
/// other failure is recorded and skipped so one broken booking does
/// not strand the rest.
pub async fn cancel_bookings_for_event(
    pool: &PgPool,
    event_id: i64,
) -> Result<Vec<BookingCancellationOutcome>, AppError> {
    let booking_ids: Vec<(i64, i64)> = sqlx::query_as(
        r#"SELECT booking_id, customer_id FROM bookings
           WHERE event_id = $1 AND cancelled = FALSE
           ORDER BY booking_id"#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    let mut outcomes = Vec::with_capacity(booking_ids.len());

    for (booking_id, customer_id) in booking_ids {
        let mut conn = pool.acquire().await?;
        let customer = ledger::get_user(&mut conn, customer_id).await?;
        drop(conn);

        match cancel_booking(pool, booking_id, &customer, false).await {
            Ok(()) => outcomes.push(BookingCancellationOutcome {
                booking_id,
                outcome: CancellationOutcome::Cancelled,
            }),
            Err(AppError::InvalidInput(_)) => {
                return Err(AppError::InvalidInput(format!(
                    "Cannot cancel event within {} days of event.",
                    BOOKING_CUTOFF_DAYS
                )));
            }
            Err(e) => {
                tracing::warn!(booking_id, error = %e, "Skipping unrefundable booking");
                outcomes.push(BookingCancellationOutcome {
                    booking_id,
                    outcome: CancellationOutcome::Failed(e.to_string()),
                });
            }
        }
    }

    Ok(outcomes)
}

// --- Booking reads ---

pub async fn get_booking_details(
    pool: &PgPool,
    booking_id: i64,
    user: &User,
) -> Result<BookingView, AppError> {
    let mut conn = pool.acquire().await?;

    let booking = get_booking(&mut conn, booking_id).await?;

    if booking.customer_id != user.user_id {
        return Err(AppError::ForbiddenAccess(
            "This user cannot view this booking.".to_string(),
        ));
    }

    let event = inventory::get_event(&mut conn, booking.event_id).await?;
    build_booking_view(&mut conn, booking, &event).await
}

pub async fn get_my_bookings(
    pool: &PgPool,
    user: &User,
    filter: BookingFilter,
) -> Result<Vec<BookingView>, AppError> {
    if user.is_host() {
        return Err(AppError::ForbiddenAccess(
            "Host cannot have bookings".to_string(),
        ));
    }

    let mut conn = pool.acquire().await?;

    let booking_ids: Vec<(i64,)> = sqlx::query_as(
        r#"SELECT b.booking_id
           FROM bookings b
           JOIN events e ON e.event_id = b.event_id
           WHERE b.customer_id = $1
             AND ($2::date IS NULL OR e.start_time >= $2)
             AND ($3::text IS NULL OR e.title ILIKE '%' || $3 || '%')
           ORDER BY b.booking_id DESC
           LIMIT $4 OFFSET $5"#,
    )
    .bind(user.user_id)
    .bind(filter.date_start)
    .bind(filter.searchstr.as_deref())
    .bind(PAGE_SIZE)
    .bind(filter.start.unwrap_or(0).max(0))
    .fetch_all(&mut *conn)
    .await?;

    let mut views = Vec::with_capacity(booking_ids.len());
    for (booking_id,) in booking_ids {
        let booking = get_booking(&mut conn, booking_id).await?;
        let event = inventory::get_event(&mut conn, booking.event_id).await?;
        views.push(build_booking_view(&mut conn, booking, &event).await?);
    }

    Ok(views)
}

/// Remaining tickets and pricing for a listing, shaped by event type.
/// Public: browsing availability requires no account.
pub async fn get_pre_booking_info(pool: &PgPool, event_id: i64) -> Result<PreBookingInfo, AppError> {
    let mut conn = pool.acquire().await?;

    let event = inventory::get_event(&mut conn, event_id).await?;

    let mut info = PreBookingInfo {
        event_info: EventPreview::from(&event),
        non_seated: None,
        seated: None,
    };

    match event.kind() {
        Some(crate::models::EventType::Online) | Some(crate::models::EventType::InPersonNonSeated) => {
            let reserves = inventory::get_event_reserves(&mut conn, event_id).await?;
            info.non_seated = Some(
                reserves
                    .into_iter()
                    .map(|r| ReservePreBookingInfo {
                        reserve_name: r.reserve_name,
                        tickets_left: r.tickets_available,
                        cost: r.cost,
                        description: r.reserve_description,
                    })
                    .collect(),
            );
        }
        Some(crate::models::EventType::InPersonSeated) => {
            let sections = inventory::get_event_section_availability(&mut conn, event_id).await?;
            info.seated = Some(
                sections
                    .into_iter()
                    .map(|s| SectionPreBookingInfo {
                        section_name: s.section_name,
                        tickets_left: s.tickets_available,
                        cost: s.cost,
                        reserve: s.reserve_name,
                        description: s.reserve_description,
                    })
                    .collect(),
            );
        }
        None => {
            return Err(AppError::BadGateway(
                "Could not parse Event. Event data is corrupted.".to_string(),
            ));
        }
    }

    Ok(info)
}

async fn get_booking(conn: &mut PgConnection, booking_id: i64) -> Result<Booking, AppError> {
    sqlx::query_as::<_, Booking>(
        r#"SELECT booking_id, event_id, customer_id, date, total_cost, total_quantity,
                  referral_code, amount_saved, cancelled
           FROM bookings WHERE booking_id = $1"#,
    )
    .bind(booking_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "Unable to find booking with booking id '{}'.",
            booking_id
        ))
    })
}

async fn get_booking_for_update(
    conn: &mut PgConnection,
    booking_id: i64,
) -> Result<Booking, AppError> {
    sqlx::query_as::<_, Booking>(
        r#"SELECT booking_id, event_id, customer_id, date, total_cost, total_quantity,
                  referral_code, amount_saved, cancelled
           FROM bookings WHERE booking_id = $1
           FOR UPDATE"#,
    )
    .bind(booking_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "Unable to find booking with booking id '{}'.",
            booking_id
        ))
    })
}

async fn get_booking_reserves(
    conn: &mut PgConnection,
    booking_id: i64,
) -> Result<Vec<BookingReserve>, AppError> {
    let lines = sqlx::query_as::<_, BookingReserve>(
        r#"SELECT booking_reserve_id, booking_id, reserve_id, quantity, unit_cost
           FROM booking_reserves WHERE booking_id = $1
           ORDER BY booking_reserve_id"#,
    )
    .bind(booking_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}

async fn build_booking_view(
    conn: &mut PgConnection,
    booking: Booking,
    event: &Event,
) -> Result<BookingView, AppError> {
    #[derive(sqlx::FromRow)]
    struct LineRow {
        booking_reserve_id: i64,
        reserve_name: String,
        quantity: i32,
        unit_cost: Decimal,
        reserve_description: Option<String>,
    }

    let lines = sqlx::query_as::<_, LineRow>(
        r#"SELECT br.booking_reserve_id, er.reserve_name, br.quantity, br.unit_cost, er.reserve_description
           FROM booking_reserves br
           JOIN event_reserves er ON er.event_reserve_id = br.reserve_id
           WHERE br.booking_id = $1
           ORDER BY br.booking_reserve_id"#,
    )
    .bind(booking.booking_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut reserves = Vec::with_capacity(lines.len());
    for line in lines {
        let seats: Vec<String> = sqlx::query_scalar(
            r#"SELECT seat_name FROM seated_tickets
               WHERE booking_reserve_id = $1 ORDER BY ticket_id"#,
        )
        .bind(line.booking_reserve_id)
        .fetch_all(&mut *conn)
        .await?;

        reserves.push(BookingReserveView {
            reserve: line.reserve_name,
            tickets: line.quantity,
            cost: line.unit_cost,
            description: line.reserve_description,
            seats,
        });
    }

    let percentage_off: Decimal = match booking.referral_code.as_deref() {
        Some(code) => {
            sqlx::query_scalar(r#"SELECT percentage_off FROM referrals WHERE referral_code = $1"#)
                .bind(code)
                .fetch_optional(&mut *conn)
                .await?
                .unwrap_or(Decimal::ZERO)
        }
        None => Decimal::ZERO,
    };

    Ok(BookingView {
        booking_id: booking.booking_id,
        cancelled: booking.cancelled,
        booking_date: booking.date,
        event_id: booking.event_id,
        total_cost: booking.total_cost,
        total_quantity: booking.total_quantity,
        referral_code: booking.referral_code,
        amount_saved: booking.amount_saved,
        percentage_off,
        reserves,
        event_info: EventPreview::from(event),
    })
}

// --- Notification emails ---

fn confirmation_email(
    recipient: &str,
    event: &Event,
    total_cost: Decimal,
    total_quantity: i32,
) -> EmailMessage {
    let body = format!(
        "Booking confirmation for {}.\n\
         Booking Details:\n\
         Total Cost: ${}.\n\
         Total Tickets: {}.\n\
         Start time: {}.\n",
        event.title,
        total_cost.round_dp(2),
        total_quantity,
        event.start_time
    );
    EmailMessage::new(
        vec![recipient.to_string()],
        "Eventstar Booking Confirmation",
        body,
    )
}

fn cancellation_email(recipient: &str, event: &Event, booking: &Booking) -> EmailMessage {
    let body = format!(
        "Booking Cancellation for {}.\n\
         Booking Details:\n\
         Total Cost: ${}.\n\
         Total Tickets: {}.\n",
        event.title,
        booking.total_cost.round_dp(2),
        booking.total_quantity
    );
    EmailMessage::new(
        vec![recipient.to_string()],
        "Eventstar Booking Cancellation",
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_event(start_in_days: i64) -> Event {
        Event {
            event_id: 1,
            host_id: 2,
            title: "GA Concert".to_string(),
            event_type: "inpersonNonSeated".to_string(),
            venue_id: None,
            start_time: Utc::now() + Duration::days(start_in_days),
            end_time: Utc::now() + Duration::days(start_in_days) + Duration::hours(2),
            cancelled: false,
        }
    }

    #[test]
    fn test_cutoff_comparison_is_strictly_greater() {
        // Blocked inside the window, allowed outside it. The gate is
        // `now + cutoff > start_time`.
        let event = test_event(BOOKING_CUTOFF_DAYS - 1);
        let cutoff = Utc::now() + Duration::days(BOOKING_CUTOFF_DAYS);
        assert!(cutoff > event.start_time);

        let event = test_event(BOOKING_CUTOFF_DAYS + 1);
        let cutoff = Utc::now() + Duration::days(BOOKING_CUTOFF_DAYS);
        assert!(cutoff <= event.start_time);
    }

    #[test]
    fn test_confirmation_email_contents() {
        let event = test_event(10);
        let msg = confirmation_email("a@b.c", &event, Decimal::new(6000, 2), 3);
        assert_eq!(msg.recipients, vec!["a@b.c".to_string()]);
        assert_eq!(msg.subject, "Eventstar Booking Confirmation");
        assert!(msg.body.contains("GA Concert"));
        assert!(msg.body.contains("Total Cost: $60.00."));
        assert!(msg.body.contains("Total Tickets: 3."));
    }

    #[test]
    fn test_event_preview_shape() {
        let event = test_event(10);
        let preview = EventPreview::from(&event);
        assert_eq!(preview.event_listing_id, 1);
        assert_eq!(preview.event_type, "inpersonNonSeated");
        assert!(!preview.cancelled);
    }

    #[test]
    fn test_booking_request_deserializes_wire_names() {
        let request: MakeBookingRequest = serde_json::from_str(
            r#"{
                "reserves": [{"reserveName": "GA", "quantity": 3, "section": "Front"}],
                "referralCode": "SAVE10",
                "eventListingId": 7
            }"#,
        )
        .unwrap();
        assert_eq!(request.event_listing_id, 7);
        assert_eq!(request.referral_code.as_deref(), Some("SAVE10"));
        assert_eq!(request.reserves[0].reserve_name, "GA");
        assert_eq!(request.reserves[0].quantity, 3);
        assert_eq!(request.reserves[0].section.as_deref(), Some("Front"));
    }

    #[test]
    fn test_booking_request_optional_fields_default() {
        let request: MakeBookingRequest = serde_json::from_str(
            r#"{"reserves": [{"reserveName": "GA", "quantity": 1}], "eventListingId": 7}"#,
        )
        .unwrap();
        assert!(request.referral_code.is_none());
        assert!(request.reserves[0].section.is_none());
    }
}
