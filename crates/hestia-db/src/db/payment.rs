use hestia_core::{
    models::{NewPayment, Payment, PAYMENT_PROVIDER},
    AppError,
};
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a payment in `created` state
    #[tracing::instrument(skip(self, payment), fields(db.table = "payment", db.operation = "insert", user_id = %payment.user_id))]
    pub async fn create(&self, payment: NewPayment) -> Result<Payment, AppError> {
        let row = sqlx::query_as::<Postgres, Payment>(
            r#"
            INSERT INTO payment (user_id, provider, external_id, amount, currency, status, description)
            VALUES ($1, $2, $3, $4, $5, 'created', $6)
            RETURNING id, user_id, provider, external_id, amount, currency, status, description, created_at, updated_at
            "#,
        )
        .bind(&payment.user_id)
        .bind(PAYMENT_PROVIDER)
        .bind(&payment.external_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
