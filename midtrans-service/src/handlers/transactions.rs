use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::{CreateTransactionRequest, CreateTransactionResponse},
    AppState,
};

/// Open a Snap checkout session for an order.
///
/// Gateway failures of any kind come back as 500 with the gateway's
/// message in `error`.
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Json<CreateTransactionResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

    let response = state.adapter.initiate_transaction(&payload).await?;

    Ok(Json(response))
}
