//! Repository traits used by the authentication and credit gates
//!
//! The gates only need two operations from the database. Keeping them behind traits lets
//! the HTTP layer be exercised with in-memory implementations.

use async_trait::async_trait;
use hestia_core::{models::CreditDebit, AppError};

use crate::db::{SessionRepository, UserRepository};

/// Resolves a session token to a user id
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve_user(&self, token: &str) -> Result<Option<String>, AppError>;
}

/// Atomically spends credits
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Spend one credit; never drives the balance below zero.
    async fn debit_one(&self, user_id: &str, reason: &str) -> Result<CreditDebit, AppError>;
}

#[async_trait]
impl SessionResolver for SessionRepository {
    async fn resolve_user(&self, token: &str) -> Result<Option<String>, AppError> {
        SessionRepository::resolve_user(self, token).await
    }
}

#[async_trait]
impl CreditLedger for UserRepository {
    async fn debit_one(&self, user_id: &str, reason: &str) -> Result<CreditDebit, AppError> {
        self.debit_credit(user_id, reason).await
    }
}
