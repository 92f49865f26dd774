//! Database repositories
//!
//! One repository per table family. Every query goes through the pooled
//! `PgPool` handed to the constructor.

pub mod contract;
pub mod payment;
pub mod session;
pub mod social;
pub mod transaction;
pub mod user;

pub use contract::ContractRepository;
pub use payment::PaymentRepository;
pub use session::{session_token_from_cookie, SessionRepository};
pub use social::SocialRepository;
pub use user::UserRepository;
