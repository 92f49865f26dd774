use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User identifier issued by the external auth library (text primary key).
pub type UserId = String;

/// Role stored on the `user` row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Agent,
    #[default]
    Visitor,
}

/// Authenticated caller attached to a request by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
}

/// Outcome of the atomic one-credit decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditDebit {
    Debited { remaining: i32 },
    Insufficient,
    UserNotFound,
}

impl CreditDebit {
    pub fn is_debited(&self) -> bool {
        matches!(self, CreditDebit::Debited { .. })
    }
}
