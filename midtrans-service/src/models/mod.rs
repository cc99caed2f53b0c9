use serde::{Deserialize, Serialize};
use std::fmt;

/// `transaction_status` as reported by the Midtrans Core API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Authorize,
    Capture,
    Settlement,
    Pending,
    Deny,
    Cancel,
    Expire,
    Failure,
    Refund,
    PartialRefund,
    Chargeback,
    PartialChargeback,
    /// A status Midtrans introduced after this list was written.
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Authorize => "authorize",
            TransactionStatus::Capture => "capture",
            TransactionStatus::Settlement => "settlement",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Deny => "deny",
            TransactionStatus::Cancel => "cancel",
            TransactionStatus::Expire => "expire",
            TransactionStatus::Failure => "failure",
            TransactionStatus::Refund => "refund",
            TransactionStatus::PartialRefund => "partial_refund",
            TransactionStatus::Chargeback => "chargeback",
            TransactionStatus::PartialChargeback => "partial_chargeback",
            TransactionStatus::Other(raw) => raw,
        }
    }

    /// What the notification handler does for this status.
    pub fn outcome(&self) -> NotificationOutcome {
        match self {
            TransactionStatus::Settlement => NotificationOutcome::PaymentSucceeded,
            TransactionStatus::Cancel => NotificationOutcome::PaymentCancelled,
            TransactionStatus::Pending => NotificationOutcome::PaymentPending,
            TransactionStatus::Authorize
            | TransactionStatus::Capture
            | TransactionStatus::Deny
            | TransactionStatus::Expire
            | TransactionStatus::Failure
            | TransactionStatus::Refund
            | TransactionStatus::PartialRefund
            | TransactionStatus::Chargeback
            | TransactionStatus::PartialChargeback
            | TransactionStatus::Other(_) => NotificationOutcome::NoAction,
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "authorize" => TransactionStatus::Authorize,
            "capture" => TransactionStatus::Capture,
            "settlement" => TransactionStatus::Settlement,
            "pending" => TransactionStatus::Pending,
            "deny" => TransactionStatus::Deny,
            "cancel" => TransactionStatus::Cancel,
            "expire" => TransactionStatus::Expire,
            "failure" => TransactionStatus::Failure,
            "refund" => TransactionStatus::Refund,
            "partial_refund" => TransactionStatus::PartialRefund,
            "chargeback" => TransactionStatus::Chargeback,
            "partial_chargeback" => TransactionStatus::PartialChargeback,
            _ => TransactionStatus::Other(raw),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationOutcome {
    PaymentSucceeded,
    PaymentCancelled,
    PaymentPending,
    /// Accepted and acknowledged without a dedicated action.
    NoAction,
}
