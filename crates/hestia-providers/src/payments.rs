//! Payment gateway charge creation.

use crate::error::{ProviderError, ProviderResult};
use anyhow::Context;
use hestia_core::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SECRET_KEY_VAR: &str = "BICTORYS_SECRET_KEY";
const CREATE_FAILED_MESSAGE: &str = "Payment create failed";

#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub metadata: ChargeMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeMetadata {
    pub user_id: String,
    pub credits_to_grant: i32,
}

/// Gateway reply. The full body is kept for the caller.
#[derive(Debug, Clone)]
pub struct ChargeResponse {
    pub external_id: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Deserialize)]
struct IdOnly {
    id: Option<serde_json::Value>,
    data: Option<Box<IdOnly>>,
}

fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ChargeResponse {
    /// `data.id` wins over a top-level `id`.
    fn from_body(body: serde_json::Value) -> Self {
        let ids: Option<IdOnly> = serde_json::from_value(body.clone()).ok();
        let external_id = ids.and_then(|ids| {
            ids.data
                .and_then(|d| d.id.as_ref().and_then(id_string))
                .or_else(|| ids.id.as_ref().and_then(id_string))
        });
        Self { external_id, body }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentGatewayClient {
    http_client: reqwest::Client,
    secret_key: Option<String>,
    api_base: String,
}

impl PaymentGatewayClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client for payment gateway")?;

        Ok(Self {
            http_client,
            secret_key: config.payment_secret_key.clone(),
            api_base: config.payment_api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_charge(&self, request: &ChargeRequest) -> ProviderResult<ChargeResponse> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or(ProviderError::MissingKey(SECRET_KEY_VAR))?;

        let response = self
            .http_client
            .post(format!("{}/pay/v1/charges", self.api_base))
            .query(&[("payment_type", "card")])
            .bearer_auth(secret_key)
            .header("accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e, "Failed to send charge to payment gateway"))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .unwrap_or(serde_json::Value::Null);

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .unwrap_or(CREATE_FAILED_MESSAGE)
                .to_string();
            tracing::warn!(status = %status, message = %message, "Payment charge rejected");
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let charge = ChargeResponse::from_body(body);
        tracing::info!(
            external_id = ?charge.external_id,
            amount = request.amount,
            currency = %request.currency,
            "Payment charge created"
        );
        Ok(charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::AppConfig;
    use mockito::Matcher;

    fn client(base: &str, key: Option<&str>) -> PaymentGatewayClient {
        let mut config = AppConfig::default().providers;
        config.payment_api_base = base.to_string();
        config.payment_secret_key = key.map(str::to_string);
        PaymentGatewayClient::new(&config).unwrap()
    }

    fn charge() -> ChargeRequest {
        ChargeRequest {
            amount: 5000,
            currency: "XOF".to_string(),
            description: "Credits purchase".to_string(),
            metadata: ChargeMetadata {
                user_id: "user-1".to_string(),
                credits_to_grant: 20,
            },
        }
    }

    #[tokio::test]
    async fn test_create_charge_reads_nested_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pay/v1/charges")
            .match_query(Matcher::UrlEncoded("payment_type".into(), "card".into()))
            .match_header("authorization", "Bearer sk_test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "amount": 5000,
                "metadata": {"userId": "user-1", "creditsToGrant": 20}
            })))
            .with_status(200)
            .with_body(r#"{"data":{"id":"ch_123"},"id":"outer"}"#)
            .create_async()
            .await;

        let response = client(&server.url(), Some("sk_test"))
            .create_charge(&charge())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.external_id.as_deref(), Some("ch_123"));
        assert_eq!(response.body["id"], "outer");
    }

    #[tokio::test]
    async fn test_rejected_charge_uses_gateway_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pay/v1/charges")
            .match_query(Matcher::Any)
            .with_status(422)
            .with_body(r#"{"message":"Amount below minimum"}"#)
            .create_async()
            .await;

        let err = client(&server.url(), Some("sk"))
            .create_charge(&charge())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Amount below minimum");
    }

    #[tokio::test]
    async fn test_rejected_charge_without_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pay/v1/charges")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server.url(), Some("sk"))
            .create_charge(&charge())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { status: 500, .. }));
        assert_eq!(err.to_string(), "Payment create failed");
    }

    #[tokio::test]
    async fn test_missing_secret_key() {
        let err = client("http://127.0.0.1:9", None)
            .create_charge(&charge())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing BICTORYS_SECRET_KEY");
    }
}
