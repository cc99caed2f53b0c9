use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("metrics handle already initialized"))
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a Snap transaction attempt (`created` or `failed`).
pub fn record_transaction(outcome: &'static str) {
    counter!("midtrans_transactions_total", "outcome" => outcome).increment(1);
}

/// Count a processed notification by its resolved status.
pub fn record_notification(transaction_status: &str) {
    counter!(
        "midtrans_notifications_total",
        "transaction_status" => transaction_status.to_string()
    )
    .increment(1);
}
