//! Referral discounts and the referrer/host fee split.
//!
//! Percentages are fractions in [0, 1], normalized exactly once when a
//! code is created. Applying a referral and refunding it are exact
//! inverses for the same (referral, total_cost) pair: both compute the
//! fee from the discounted total with the same rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::models::{Referral, User};
use crate::utils::error::AppError;

/// Split a pre-discount total into (final_cost, referrer_fee, host_cut)
/// for the given discount and cut fractions. Amounts are rounded to
/// cents at computation so the refund path reproduces the same fee.
pub fn discount_split(
    total_cost: Decimal,
    percentage_off: Decimal,
    referrer_cut: Decimal,
) -> (Decimal, Decimal, Decimal) {
    let final_cost = (total_cost * (Decimal::ONE - percentage_off)).round_dp(2);
    let referrer_fee = (final_cost * referrer_cut).round_dp(2);
    let host_cut = final_cost - referrer_fee;
    (final_cost, referrer_fee, host_cut)
}

/// Fee taken out of an already-discounted total on refund.
pub fn refund_split(total_cost: Decimal, referrer_cut: Decimal) -> (Decimal, Decimal) {
    let referrer_fee = (total_cost * referrer_cut).round_dp(2);
    (referrer_fee, total_cost - referrer_fee)
}

/// Result of pricing a booking. `referral_code` is only set when a
/// live code was actually applied, so the booking row never references
/// a code that does not exist.
#[derive(Debug, Clone)]
pub struct AppliedPricing {
    pub final_cost: Decimal,
    pub host_cut: Decimal,
    pub referral_code: Option<String>,
}

impl AppliedPricing {
    fn undiscounted(total_cost: Decimal) -> Self {
        AppliedPricing {
            final_cost: total_cost,
            host_cut: total_cost,
            referral_code: None,
        }
    }
}

/// Apply a referral code to a booking total.
///
/// A missing, empty, inactive or unreadable code degrades to
/// no-discount rather than failing the purchase; that graceful
/// fallback is product behavior, not an oversight. A successful
/// application bumps the referral's running totals inside the caller's
/// transaction so cancellation can reverse them.
pub async fn apply_discount_and_referral_fee(
    conn: &mut PgConnection,
    referral_code: Option<&str>,
    total_cost: Decimal,
) -> Result<AppliedPricing, AppError> {
    let code = match referral_code {
        Some(code) if !code.is_empty() => code,
        _ => return Ok(AppliedPricing::undiscounted(total_cost)),
    };

    let referral = match get_referral_for_update(conn, code).await {
        Ok(Some(referral)) if referral.is_active => referral,
        Ok(_) => return Ok(AppliedPricing::undiscounted(total_cost)),
        Err(e) => {
            tracing::warn!(code = %code, error = %e, "Referral lookup failed; booking proceeds undiscounted");
            return Ok(AppliedPricing::undiscounted(total_cost));
        }
    };

    let (final_cost, referrer_fee, host_cut) =
        discount_split(total_cost, referral.percentage_off, referral.referrer_cut);

    sqlx::query(
        r#"UPDATE referrals
           SET amount_paid = amount_paid + $1, amount_used = amount_used + 1
           WHERE referral_code = $2"#,
    )
    .bind(referrer_fee)
    .bind(code)
    .execute(&mut *conn)
    .await?;

    Ok(AppliedPricing {
        final_cost,
        host_cut,
        referral_code: Some(code.to_string()),
    })
}

/// Reverse the referral fee for a cancelled booking. `total_cost` is
/// the booking's post-discount total. Returns the amount to deduct
/// from the host. No referral on the booking means the host refunds
/// the full amount.
pub async fn refund_referral_fee(
    conn: &mut PgConnection,
    referral_code: Option<&str>,
    total_cost: Decimal,
) -> Result<Decimal, AppError> {
    let code = match referral_code {
        Some(code) if !code.is_empty() => code,
        _ => return Ok(total_cost),
    };

    let referral = match get_referral_for_update(conn, code).await? {
        Some(referral) => referral,
        None => return Ok(total_cost),
    };

    let (referrer_fee, host_amount) = refund_split(total_cost, referral.referrer_cut);

    sqlx::query(
        r#"UPDATE referrals
           SET amount_paid = amount_paid - $1, amount_used = amount_used - 1
           WHERE referral_code = $2"#,
    )
    .bind(referrer_fee)
    .bind(code)
    .execute(&mut *conn)
    .await?;

    Ok(host_amount)
}

async fn get_referral_for_update(
    conn: &mut PgConnection,
    referral_code: &str,
) -> Result<Option<Referral>, AppError> {
    let referral = sqlx::query_as::<_, Referral>(
        r#"SELECT referral_code, host_id, percentage_off, referrer_cut, referrer_name,
                  pay_id_phone, is_active, amount_paid, amount_used
           FROM referrals WHERE referral_code = $1
           FOR UPDATE"#,
    )
    .bind(referral_code)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(referral)
}

// --- Referral lifecycle (host-only) ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralInfo {
    pub referral_code: String,
    /// Percentages arrive as 0-100 and are normalized on write.
    pub percentage_off: Decimal,
    pub referrer_cut: Decimal,
    pub name: String,
    pub pay_id_phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralView {
    pub referral_code: String,
    pub percentage_off: Decimal,
    pub referrer_cut: Decimal,
    pub name: String,
    pub pay_id_phone: String,
    pub is_active: bool,
    pub amount_paid: Decimal,
    pub no_used: i32,
}

impl From<Referral> for ReferralView {
    fn from(referral: Referral) -> Self {
        ReferralView {
            referral_code: referral.referral_code,
            percentage_off: referral.percentage_off,
            referrer_cut: referral.referrer_cut,
            name: referral.referrer_name,
            pay_id_phone: referral.pay_id_phone,
            is_active: referral.is_active,
            amount_paid: referral.amount_paid,
            no_used: referral.amount_used,
        }
    }
}

const PERCENT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

fn normalize_percentage(value: Decimal, label: &str) -> Result<Decimal, AppError> {
    if value < Decimal::ZERO || value > PERCENT {
        return Err(AppError::InvalidInput(format!(
            "{} must be between 0 and 100 (%).",
            label
        )));
    }
    Ok(value / PERCENT)
}

pub async fn create_referral(
    pool: &PgPool,
    info: ReferralInfo,
    user: &User,
) -> Result<(), AppError> {
    if !user.is_host() {
        return Err(AppError::ForbiddenAction(
            "User cannot create a new referral code.".to_string(),
        ));
    }

    if info.referral_code.is_empty() {
        return Err(AppError::InvalidInput(
            "Cannot create an empty referral code.".to_string(),
        ));
    }

    let percentage_off = normalize_percentage(info.percentage_off, "Discount percentage")?;
    let referrer_cut = normalize_percentage(info.referrer_cut, "Referer percentage cut")?;

    let result = sqlx::query(
        r#"INSERT INTO referrals
               (referral_code, host_id, percentage_off, referrer_cut, referrer_name,
                pay_id_phone, is_active, amount_paid, amount_used)
           VALUES ($1, $2, $3, $4, $5, $6, TRUE, 0, 0)
           ON CONFLICT (referral_code) DO NOTHING"#,
    )
    .bind(&info.referral_code)
    .bind(user.user_id)
    .bind(percentage_off)
    .bind(referrer_cut)
    .bind(&info.name)
    .bind(&info.pay_id_phone)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::InvalidInput(format!(
            "Cannot add referral code '{}'. Referral code already exists.",
            info.referral_code
        )));
    }

    Ok(())
}

pub async fn get_referral(pool: &PgPool, referral_code: &str) -> Result<Referral, AppError> {
    sqlx::query_as::<_, Referral>(
        r#"SELECT referral_code, host_id, percentage_off, referrer_cut, referrer_name,
                  pay_id_phone, is_active, amount_paid, amount_used
           FROM referrals WHERE referral_code = $1"#,
    )
    .bind(referral_code)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Referral code '{}' is invalid.", referral_code)))
}

/// Discount fraction for an active code; expired codes are rejected.
pub async fn get_referral_discount(
    pool: &PgPool,
    referral_code: &str,
) -> Result<Decimal, AppError> {
    let referral = get_referral(pool, referral_code).await?;

    if !referral.is_active {
        return Err(AppError::InvalidInput(format!(
            "Referral code '{}' has expired.",
            referral_code
        )));
    }

    Ok(referral.percentage_off)
}

pub async fn deactivate_referral(
    pool: &PgPool,
    referral_code: &str,
    user: &User,
) -> Result<(), AppError> {
    if !user.is_host() {
        return Err(AppError::ForbiddenAction(format!(
            "User '{}' is not a Host.",
            user.username
        )));
    }

    let referral = get_referral(pool, referral_code).await?;
    if referral.host_id != user.user_id {
        return Err(AppError::ForbiddenAccess(format!(
            "Host '{}' does not have access to this referral code '{}'.",
            user.username, referral_code
        )));
    }

    if !referral.is_active {
        return Err(AppError::InvalidInput(format!(
            "Cannot deactivate referral code '{}'. Referral code is already inactive.",
            referral_code
        )));
    }

    sqlx::query(r#"UPDATE referrals SET is_active = FALSE WHERE referral_code = $1"#)
        .bind(referral_code)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn reactivate_referral(
    pool: &PgPool,
    referral_code: &str,
    user: &User,
) -> Result<(), AppError> {
    let referral = get_referral(pool, referral_code).await?;

    if referral.host_id != user.user_id {
        return Err(AppError::ForbiddenAccess(format!(
            "User '{}' cannot access this referral.",
            user.username
        )));
    }

    if referral.is_active {
        return Err(AppError::InvalidInput(format!(
            "Cannot add referral code '{}'. Referral code is already active.",
            referral_code
        )));
    }

    sqlx::query(r#"UPDATE referrals SET is_active = TRUE WHERE referral_code = $1"#)
        .bind(referral_code)
        .execute(pool)
        .await?;

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostReferrals {
    pub active_referrals: Vec<ReferralView>,
    pub inactive_referrals: Vec<ReferralView>,
}

pub async fn get_host_referrals(pool: &PgPool, user: &User) -> Result<HostReferrals, AppError> {
    if !user.is_host() {
        return Err(AppError::ForbiddenAction(format!(
            "User '{}' is not a Host.",
            user.username
        )));
    }

    let referrals = sqlx::query_as::<_, Referral>(
        r#"SELECT referral_code, host_id, percentage_off, referrer_cut, referrer_name,
                  pay_id_phone, is_active, amount_paid, amount_used
           FROM referrals WHERE host_id = $1 ORDER BY referral_code"#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let (active, inactive): (Vec<_>, Vec<_>) = referrals.into_iter().partition(|r| r.is_active);

    Ok(HostReferrals {
        active_referrals: active.into_iter().map(ReferralView::from).collect(),
        inactive_referrals: inactive.into_iter().map(ReferralView::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    #[test]
    fn test_discount_split_reference_values() {
        // $100 total, 10% off, 20% referrer cut
        let (final_cost, fee, host_cut) = discount_split(dec(100, 0), dec(1, 1), dec(2, 1));
        assert_eq!(final_cost, dec(9000, 2));
        assert_eq!(fee, dec(1800, 2));
        assert_eq!(host_cut, dec(7200, 2));
    }

    #[test]
    fn test_refund_is_exact_inverse_of_apply() {
        let (final_cost, fee, host_cut) = discount_split(dec(100, 0), dec(1, 1), dec(2, 1));
        let (refund_fee, host_amount) = refund_split(final_cost, dec(2, 1));
        assert_eq!(refund_fee, fee);
        assert_eq!(host_amount, host_cut);
    }

    #[test]
    fn test_zero_percentages_are_identity() {
        let (final_cost, fee, host_cut) = discount_split(dec(5550, 2), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(final_cost, dec(5550, 2));
        assert_eq!(fee, Decimal::ZERO);
        assert_eq!(host_cut, dec(5550, 2));
    }

    #[test]
    fn test_split_rounds_to_cents() {
        // 33.33 with 15% off -> 28.3305, rounds to 28.33
        let (final_cost, _, _) = discount_split(dec(3333, 2), dec(15, 2), Decimal::ZERO);
        assert_eq!(final_cost, dec(2833, 2));
    }

    #[test]
    fn test_normalize_percentage_bounds() {
        assert!(normalize_percentage(dec(-1, 0), "Discount percentage").is_err());
        assert!(normalize_percentage(dec(101, 0), "Discount percentage").is_err());
        assert_eq!(
            normalize_percentage(dec(25, 0), "Discount percentage").unwrap(),
            dec(25, 2)
        );
        assert_eq!(
            normalize_percentage(dec(100, 0), "Discount percentage").unwrap(),
            Decimal::ONE
        );
    }
}
