use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

pub const DEFAULT_CURRENCY: &str = "XOF";
pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Credits purchase";
pub const DEFAULT_CREDITS_TO_GRANT: i32 = 20;
pub const PAYMENT_PROVIDER: &str = "bictorys";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Created,
    Succeeded,
    Failed,
}

/// Stored payment row. Amounts are whole units of the currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub user_id: String,
    pub provider: String,
    pub external_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a payment created after a successful gateway charge
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub external_id: Option<String>,
}

/// Format a whole-unit XOF amount for display, e.g. `15 000 FCFA`.
pub fn format_xof(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{}{} FCFA", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_xof_groups_thousands() {
        assert_eq!(format_xof(15000.0), "15 000 FCFA");
        assert_eq!(format_xof(999.4), "999 FCFA");
        assert_eq!(format_xof(1234567.6), "1 234 568 FCFA");
        assert_eq!(format_xof(-2500.0), "-2 500 FCFA");
    }

    #[test]
    fn test_payment_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Created).unwrap(),
            r#""created""#
        );
    }
}
