//! In-memory session and credit stores standing in for Postgres.

use async_trait::async_trait;
use hestia_core::models::CreditDebit;
use hestia_core::AppError;
use hestia_db::{CreditLedger, SessionResolver};
use std::collections::HashMap;
use std::sync::Mutex;

pub const TEST_TOKEN: &str = "test-session-token";
pub const TEST_USER_ID: &str = "user-1";

/// Token for a session whose user row does not exist.
pub const ORPHAN_TOKEN: &str = "orphan-session-token";
pub const ORPHAN_USER_ID: &str = "user-gone";

pub fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

pub struct InMemorySessions {
    sessions: HashMap<String, String>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        let sessions = HashMap::from([
            (TEST_TOKEN.to_string(), TEST_USER_ID.to_string()),
            (ORPHAN_TOKEN.to_string(), ORPHAN_USER_ID.to_string()),
        ]);
        Self { sessions }
    }
}

#[async_trait]
impl SessionResolver for InMemorySessions {
    async fn resolve_user(&self, token: &str) -> Result<Option<String>, AppError> {
        Ok(self.sessions.get(token).cloned())
    }
}

pub struct InMemoryCredits {
    balances: Mutex<HashMap<String, i32>>,
    debits: Mutex<Vec<(String, String)>>,
}

impl InMemoryCredits {
    pub fn new(balance: i32) -> Self {
        Self {
            balances: Mutex::new(HashMap::from([(TEST_USER_ID.to_string(), balance)])),
            debits: Mutex::new(Vec::new()),
        }
    }

    pub fn balance(&self, user_id: &str) -> Option<i32> {
        self.balances.lock().unwrap().get(user_id).copied()
    }

    /// `(user_id, reason)` for every successful debit
    pub fn debits(&self) -> Vec<(String, String)> {
        self.debits.lock().unwrap().clone()
    }
}

#[async_trait]
impl CreditLedger for InMemoryCredits {
    async fn debit_one(&self, user_id: &str, reason: &str) -> Result<CreditDebit, AppError> {
        let mut balances = self.balances.lock().unwrap();
        let Some(balance) = balances.get_mut(user_id) else {
            return Ok(CreditDebit::UserNotFound);
        };
        if *balance <= 0 {
            return Ok(CreditDebit::Insufficient);
        }
        *balance -= 1;
        self.debits
            .lock()
            .unwrap()
            .push((user_id.to_string(), reason.to_string()));
        Ok(CreditDebit::Debited {
            remaining: *balance,
        })
    }
}
