pub mod adapter;
pub mod gateway;
pub mod metrics;
pub mod midtrans;

pub use adapter::{NotificationReport, TransactionGatewayAdapter};
pub use gateway::{GatewayError, PaymentGateway};
pub use metrics::{get_metrics, init_metrics};
pub use midtrans::MidtransClient;
