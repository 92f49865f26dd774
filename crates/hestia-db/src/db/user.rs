use hestia_core::{models::CreditDebit, AppError};
use sqlx::{PgPool, Postgres};

/// Repository for the credit balance on `user` rows
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Take one credit from the user.
    ///
    /// The decrement is a single conditional `UPDATE`, so concurrent requests from the same
    /// user can never drive the balance below zero. A ledger row is written in the same
    /// transaction.
    #[tracing::instrument(skip(self), fields(db.table = "user", db.operation = "update"))]
    pub async fn debit_credit(&self, user_id: &str, reason: &str) -> Result<CreditDebit, AppError> {
        let mut tx = self.pool.begin().await?;

        let remaining = sqlx::query_scalar::<Postgres, i32>(
            r#"UPDATE "user" SET credits = credits - 1, "updatedAt" = NOW() WHERE id = $1 AND credits > 0 RETURNING credits"#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining) = remaining else {
            tx.rollback().await?;
            let exists = sqlx::query_scalar::<Postgres, bool>(
                r#"SELECT EXISTS(SELECT 1 FROM "user" WHERE id = $1)"#,
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

            return Ok(if exists {
                CreditDebit::Insufficient
            } else {
                CreditDebit::UserNotFound
            });
        };

        sqlx::query("INSERT INTO credits (user_id, amount, reason) VALUES ($1, -1, $2)")
            .bind(user_id)
            .bind(reason)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(user_id = %user_id, remaining, "Credit debited");
        Ok(CreditDebit::Debited { remaining })
    }

    #[tracing::instrument(skip(self), fields(db.table = "user", db.operation = "select"))]
    pub async fn get_credits(&self, user_id: &str) -> Result<Option<i32>, AppError> {
        let credits =
            sqlx::query_scalar::<Postgres, i32>(r#"SELECT credits FROM "user" WHERE id = $1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(credits)
    }
}
