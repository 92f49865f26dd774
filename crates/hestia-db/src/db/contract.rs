use chrono::{DateTime, Utc};
use hestia_core::{models::ContractRevenue, AppError};
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Signed contracts created at or after `since`
    #[tracing::instrument(skip(self), fields(db.table = "contract", db.operation = "select"))]
    pub async fn signed_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<ContractRevenue>, AppError> {
        let rows = sqlx::query_as::<Postgres, ContractRevenue>(
            r#"
            SELECT price, created_at, type
            FROM contract
            WHERE status = 'signed' AND created_at >= $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
