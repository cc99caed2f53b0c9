//! Transaction gateway adapter.
//!
//! Turns inbound requests into gateway calls and reports what happened.
//! Nothing is stored: order and payment state exist only in the logs.

use serde_json::Value;
use std::sync::Arc;

use super::gateway::{
    CustomerDetails, GatewayError, PaymentGateway, SnapTransactionRequest, TransactionDetails,
};
use super::metrics;
use crate::dtos::{CreateTransactionRequest, CreateTransactionResponse};
use crate::models::{NotificationOutcome, TransactionStatus};

#[derive(Clone)]
pub struct TransactionGatewayAdapter {
    gateway: Arc<dyn PaymentGateway>,
}

/// Result of a processed notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationReport {
    pub order_id: Option<String>,
    pub transaction_status: Option<TransactionStatus>,
    pub outcome: NotificationOutcome,
}

impl From<&CreateTransactionRequest> for SnapTransactionRequest {
    fn from(request: &CreateTransactionRequest) -> Self {
        Self {
            transaction_details: TransactionDetails {
                order_id: request.order_id.clone(),
                gross_amount: request.amount.clone(),
            },
            customer_details: CustomerDetails {
                first_name: request.name.clone(),
                email: request.email.clone(),
            },
        }
    }
}

/// Caller-supplied value as it should read in a log line.
fn log_field(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

impl TransactionGatewayAdapter {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn initiate_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, GatewayError> {
        let snap_request = SnapTransactionRequest::from(request);

        match self.gateway.create_transaction(&snap_request).await {
            Ok(transaction) => {
                metrics::record_transaction("created");
                tracing::info!(
                    order_id = %log_field(&request.order_id),
                    amount = %log_field(&request.amount),
                    "Transaction created"
                );

                Ok(CreateTransactionResponse {
                    token: transaction.token,
                    redirect_url: transaction.redirect_url,
                })
            }
            Err(e) => {
                metrics::record_transaction("failed");
                tracing::error!(
                    order_id = %log_field(&request.order_id),
                    error = ?e,
                    "Failed to create transaction"
                );
                Err(e)
            }
        }
    }

    pub async fn ingest_notification(
        &self,
        payload: &Value,
    ) -> Result<NotificationReport, GatewayError> {
        let status = self
            .gateway
            .verify_notification(payload)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to process notification");
                e
            })?;

        let order_id = status.order_id.as_deref().unwrap_or("-");
        let transaction_status = status
            .transaction_status
            .as_ref()
            .map(TransactionStatus::as_str)
            .unwrap_or("-");

        tracing::info!(
            order_id = %order_id,
            transaction_status = %transaction_status,
            payment_type = ?status.payment_type,
            fraud_status = ?status.fraud_status,
            "Notification received"
        );
        metrics::record_notification(transaction_status);

        let outcome = status
            .transaction_status
            .as_ref()
            .map(TransactionStatus::outcome)
            .unwrap_or(NotificationOutcome::NoAction);

        match outcome {
            NotificationOutcome::PaymentSucceeded => {
                tracing::info!(order_id = %order_id, "Payment settled")
            }
            NotificationOutcome::PaymentCancelled => {
                tracing::info!(order_id = %order_id, "Payment cancelled")
            }
            NotificationOutcome::PaymentPending => {
                tracing::info!(order_id = %order_id, "Payment pending")
            }
            NotificationOutcome::NoAction => {}
        }

        Ok(NotificationReport {
            order_id: status.order_id,
            transaction_status: status.transaction_status,
            outcome,
        })
    }
}
