//! Midtrans payment provider client.
//!
//! Snap issues checkout sessions (`token` + `redirect_url`); the Core API
//! status endpoint is the source of truth behind HTTP notifications.

use crate::config::{MidtransConfig, PaymentEnvironment};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha512};
use std::borrow::Cow;
use subtle::ConstantTimeEq;

use super::gateway::{
    GatewayError, PaymentGateway, SnapTransaction, SnapTransactionRequest,
    TransactionStatusResponse,
};

/// Core API `status_code` for an expired transaction. Returned like an
/// error code but describes a normal transaction state.
const STATUS_CODE_EXPIRED: u16 = 407;

/// Midtrans client for Snap and the Core API.
#[derive(Clone)]
pub struct MidtransClient {
    client: Client,
    config: MidtransConfig,
}

/// Snap error body.
#[derive(Debug, Deserialize)]
struct SnapErrorResponse {
    error_messages: Vec<String>,
}

impl MidtransClient {
    pub fn new(config: MidtransConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn environment(&self) -> PaymentEnvironment {
        self.config.environment
    }

    /// Create a Snap transaction.
    pub async fn create_snap_transaction(
        &self,
        request: &SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError> {
        let url = format!("{}/v1/transactions", self.config.snap_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(self.config.server_key.expose_secret(), None::<&str>)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Midtrans create transaction response");

        if !status.is_success() {
            let error = api_error(status.as_u16(), &body);
            tracing::error!(error = %error, "Midtrans transaction creation failed");
            return Err(error);
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the current status of a transaction by Midtrans transaction id
    /// (or order id).
    pub async fn transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse, GatewayError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| GatewayError::BaseUrl(format!("{}: {}", self.config.api_base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::BaseUrl(self.config.api_base_url.clone()))?
            .pop_if_empty()
            .extend(["v2", transaction_id, "status"]);

        let response = self
            .client
            .get(url)
            .basic_auth(self.config.server_key.expose_secret(), None::<&str>)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            status = %status,
            transaction_id = %transaction_id,
            "Midtrans transaction status response"
        );

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_str(&body)?;

        // The Core API reports failures inside a 200 response.
        if let Some(code) = body_status_code(&value) {
            if code >= 400 && code != STATUS_CODE_EXPIRED {
                return Err(GatewayError::Api {
                    status: code,
                    message: value
                        .get("status_message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or(body),
                });
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Check the payload's `signature_key`, when it has one.
    ///
    /// `signature_key = hex(SHA-512(order_id + status_code + gross_amount + server_key))`
    pub fn verify_signature(&self, payload: &Value) -> Result<(), GatewayError> {
        let Some(signature) = payload.get("signature_key").and_then(Value::as_str) else {
            return Ok(());
        };

        let expected = notification_signature(
            &field_text(payload, "order_id"),
            &field_text(payload, "status_code"),
            &field_text(payload, "gross_amount"),
            self.config.server_key.expose_secret(),
        );

        if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            Ok(())
        } else {
            tracing::warn!(
                order_id = %field_text(payload, "order_id"),
                "Notification signature verification failed"
            );
            Err(GatewayError::InvalidSignature)
        }
    }
}

#[async_trait]
impl PaymentGateway for MidtransClient {
    async fn create_transaction(
        &self,
        request: &SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError> {
        self.create_snap_transaction(request).await
    }

    async fn verify_notification(
        &self,
        payload: &Value,
    ) -> Result<TransactionStatusResponse, GatewayError> {
        // Notifications may also arrive as a JSON document inside a string.
        let payload: Cow<'_, Value> = match payload {
            Value::String(raw) => Cow::Owned(serde_json::from_str(raw)?),
            other => Cow::Borrowed(other),
        };

        if self.config.verify_signature {
            self.verify_signature(&payload)?;
        }

        let transaction_id = payload
            .get("transaction_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(GatewayError::MissingTransactionId)?;

        self.transaction_status(transaction_id).await
    }
}

/// Hex SHA-512 signature Midtrans attaches to notifications.
pub fn notification_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

fn field_text(payload: &Value, name: &str) -> String {
    match payload.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn body_status_code(value: &Value) -> Option<u16> {
    match value.get("status_code")? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    }
}

fn api_error(status: u16, body: &str) -> GatewayError {
    let message = match serde_json::from_str::<SnapErrorResponse>(body) {
        Ok(error) if !error.error_messages.is_empty() => error.error_messages.join(", "),
        _ => serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("status_message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                }
            }),
    };

    GatewayError::Api { status, message }
}
