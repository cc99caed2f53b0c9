//! The two capabilities this service needs from a payment gateway.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use thiserror::Error;

use crate::models::TransactionStatus;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Midtrans request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Midtrans API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid Midtrans response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid Midtrans base URL: {0}")]
    BaseUrl(String),

    #[error("Notification payload has no transaction_id")]
    MissingTransactionId,

    #[error("Notification signature_key does not match")]
    InvalidSignature,
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidSignature => AppError::Unauthorized(anyhow::Error::new(err)),
            other => AppError::UpstreamError(anyhow::Error::new(other)),
        }
    }
}

/// Snap `POST /v1/transactions` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapTransactionRequest {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_amount: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
}

/// Snap checkout session issued for a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

/// Core API transaction status, the authoritative state behind a
/// notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionStatusResponse {
    #[serde(default, deserialize_with = "string_or_number")]
    pub status_code: Option<String>,
    pub status_message: Option<String>,
    pub transaction_id: Option<String>,
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gross_amount: Option<String>,
    pub payment_type: Option<String>,
    pub transaction_status: Option<TransactionStatus>,
    pub fraud_status: Option<String>,
    pub transaction_time: Option<String>,
    pub signature_key: Option<String>,
}

/// Midtrans sends some fields as `"200"` and some clients as `200`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session for the transaction.
    async fn create_transaction(
        &self,
        request: &SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError>;

    /// Resolve a raw notification into the gateway's current view of the
    /// transaction.
    async fn verify_notification(
        &self,
        payload: &serde_json::Value,
    ) -> Result<TransactionStatusResponse, GatewayError>;
}
