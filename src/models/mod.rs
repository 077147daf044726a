pub mod booking;
pub mod event;
pub mod referral;
pub mod reserve;
pub mod sales;
pub mod transaction;
pub mod user;
pub mod venue;

pub use booking::{Booking, BookingReserve, SeatedTicket};
pub use event::{Event, EventType};
pub use referral::Referral;
pub use reserve::{EventReserve, EventSection};
pub use sales::{EventReserveSales, HostDailySales};
pub use transaction::LedgerEntry;
pub use user::{HostProfile, User, UserRole};
pub use venue::{VenueSeat, VenueSection};
