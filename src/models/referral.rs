use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A host-owned discount code that also pays a cut to a third-party
/// referrer. `percentage_off` and `referrer_cut` are fractions in
/// [0, 1], normalized once when the code is created. The running
/// totals are mutated on every booking that uses the code and
/// reversed symmetrically when such a booking is cancelled.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Referral {
    pub referral_code: String,
    pub host_id: i64,
    pub percentage_off: Decimal,
    pub referrer_cut: Decimal,
    pub referrer_name: String,
    pub pay_id_phone: String,
    pub is_active: bool,
    pub amount_paid: Decimal,
    pub amount_used: i32,
}
