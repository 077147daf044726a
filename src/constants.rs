//! Business constants shared across the engine.

use rust_decimal::Decimal;

/// Self-service cancellation is blocked this many days before the
/// event starts. Host-driven event cancellation bypasses the window.
pub const BOOKING_CUTOFF_DAYS: i64 = 7;

/// Hard global cap on tickets per booking, across all reserve lines.
pub const MAX_TICKETS_PER_BOOKING: i32 = 10;

/// Page size for booking and transaction listings.
pub const PAGE_SIZE: i64 = 10;

/// Upper bound on a stored balance ($100,000,000).
pub const MAX_BALANCE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);
