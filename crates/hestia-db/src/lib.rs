//! Hestia Database Layer
//!
//! Postgres repositories for sessions, credits, payments, social scheduling and contracts,
//! plus the narrow traits the request gates depend on.

pub mod db;
pub mod gate_traits;

pub use db::transaction::TransactionGuard;
pub use db::{
    session_token_from_cookie, ContractRepository, PaymentRepository, SessionRepository,
    SocialRepository, UserRepository,
};
pub use gate_traits::{CreditLedger, SessionResolver};
