use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// Host-specific account payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostProfile {
    pub org_name: String,
}

/// Account role, resolved by pattern match rather than subtype tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum UserRole {
    Customer,
    Host(HostProfile),
}

impl UserRole {
    /// Discriminator value as stored in the `role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "user",
            UserRole::Host(_) => "host",
        }
    }

    pub fn from_columns(role: &str, org_name: Option<String>) -> Self {
        match role {
            "host" => UserRole::Host(HostProfile {
                org_name: org_name.unwrap_or_default(),
            }),
            _ => UserRole::Customer,
        }
    }
}

/// A user account as the booking engine sees it: identity plus the
/// balance the ledger mutates. Authentication lives elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub balance: Decimal,
}

impl User {
    pub fn is_host(&self) -> bool {
        matches!(self.role, UserRole::Host(_))
    }
}

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let org_name: Option<String> = row.try_get("org_name")?;

        Ok(User {
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            role: UserRole::from_columns(&role, org_name),
            balance: row.try_get("balance")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_columns() {
        assert_eq!(UserRole::from_columns("user", None), UserRole::Customer);
        assert_eq!(
            UserRole::from_columns("host", Some("Eventstar Inc".to_string())),
            UserRole::Host(HostProfile {
                org_name: "Eventstar Inc".to_string()
            })
        );
        // unknown discriminators degrade to the customer role
        assert_eq!(UserRole::from_columns("admin", None), UserRole::Customer);
    }

    #[test]
    fn test_role_discriminator_round_trip() {
        assert_eq!(UserRole::from_columns("host", None).as_str(), "host");
        assert_eq!(UserRole::Customer.as_str(), "user");
    }
}
