use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NOTIFICATION_ACK_MESSAGE: &str = "Notifikasi berhasil diproses";

/// Body of `POST /createTransaction`.
///
/// Nothing is validated here, not even the JSON types: each field is
/// forwarded exactly as sent, absent fields are left out of the Snap
/// request, and Midtrans reports what it rejects.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub order_id: Option<Value>,
    pub amount: Option<Value>,
    pub name: Option<Value>,
    pub email: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTransactionResponse {
    pub token: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationAck {
    pub message: String,
}

impl NotificationAck {
    pub fn processed() -> Self {
        Self {
            message: NOTIFICATION_ACK_MESSAGE.to_string(),
        }
    }
}
