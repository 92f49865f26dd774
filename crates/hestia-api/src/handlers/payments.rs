//! Credit purchases through the payment gateway.

use crate::auth::AuthUser;
use crate::error::{provider_error, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use hestia_core::models::{
    NewPayment, Payment, DEFAULT_CREDITS_TO_GRANT, DEFAULT_CURRENCY, DEFAULT_PAYMENT_DESCRIPTION,
};
use hestia_core::AppError;
use hestia_providers::payments::ChargeMetadata;
use hestia_providers::ChargeRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeBody {
    /// Whole units of `currency`
    #[serde(default)]
    pub amount: f64,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub credits_to_grant: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCreatedResponse {
    pub ok: bool,
    pub payment: Payment,
    /// Gateway reply, passed through untouched
    #[schema(value_type = Object)]
    pub provider: serde_json::Value,
    pub credits_to_grant: i32,
}

impl ChargeBody {
    fn into_charge(self, user_id: &str) -> Result<ChargeRequest, AppError> {
        let amount = self.amount.round();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::InvalidInput("Invalid amount".to_string()));
        }

        Ok(ChargeRequest {
            amount: amount as i64,
            currency: self
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            description: self
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string()),
            metadata: ChargeMetadata {
                user_id: user_id.to_string(),
                credits_to_grant: self.credits_to_grant.unwrap_or(DEFAULT_CREDITS_TO_GRANT),
            },
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/payments/charge",
    tag = "payments",
    request_body = ChargeBody,
    responses(
        (status = 200, description = "Charge created", body = ChargeCreatedResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Gateway rejected the charge", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id, operation = "create_charge"))]
pub async fn create_charge(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<ChargeBody>,
) -> Result<Json<ChargeCreatedResponse>, HttpAppError> {
    let charge = body.into_charge(&user.user_id)?;

    let response = state
        .integrations
        .payment_gateway
        .create_charge(&charge)
        .await
        .map_err(|e| provider_error("payments", e))?;

    let payment = state
        .db
        .payments
        .create(NewPayment {
            user_id: user.user_id.clone(),
            amount: charge.amount,
            currency: charge.currency,
            description: charge.description,
            external_id: response.external_id,
        })
        .await?;

    tracing::info!(payment_id = %payment.id, amount = payment.amount, "Payment created");

    Ok(Json(ChargeCreatedResponse {
        ok: true,
        payment,
        provider: response.body,
        credits_to_grant: charge.metadata.credits_to_grant,
    }))
}
