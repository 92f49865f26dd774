use hestia_core::AppError;
use sqlx::{PgPool, Postgres};

/// Read-only access to sessions issued by the auth library
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

/// Session cookies are signed as `<token>.<signature>`; only the token is stored.
pub fn session_token_from_cookie(value: &str) -> &str {
    value.split('.').next().unwrap_or(value)
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve an unexpired session token to its user id
    #[tracing::instrument(skip(self, token), fields(db.table = "session", db.operation = "select"))]
    pub async fn resolve_user(&self, token: &str) -> Result<Option<String>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }

        let user_id = sqlx::query_scalar::<Postgres, String>(
            r#"
            SELECT s."userId"
            FROM session s
            JOIN "user" u ON u.id = s."userId"
            WHERE s.token = $1 AND s."expiresAt" > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_signature_stripped() {
        assert_eq!(session_token_from_cookie("abc123.c2lnbmF0dXJl"), "abc123");
        assert_eq!(session_token_from_cookie("plain"), "plain");
        assert_eq!(session_token_from_cookie(""), "");
    }
}
