use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;

use crate::{dtos::NotificationAck, AppState};

/// Midtrans HTTP notification (webhook) endpoint.
///
/// The payload is resolved through the gateway and acknowledged with 200
/// whatever the transaction status turns out to be.
pub async fn notification(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<NotificationAck>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

    let report = state.adapter.ingest_notification(&payload).await?;

    tracing::debug!(
        order_id = ?report.order_id,
        outcome = ?report.outcome,
        "Notification acknowledged"
    );

    Ok(Json(NotificationAck::processed()))
}
