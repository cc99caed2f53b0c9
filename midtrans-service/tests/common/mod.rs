#![allow(dead_code)]

use async_trait::async_trait;
use midtrans_service::config::{Config, MidtransConfig, PaymentEnvironment};
use midtrans_service::services::gateway::{
    GatewayError, PaymentGateway, SnapTransaction, SnapTransactionRequest,
    TransactionStatusResponse,
};
use midtrans_service::startup::Application;
use secrecy::Secret;
use serde_json::Value;
use service_core::config as core_config;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::MockServer;

pub const TEST_SERVER_KEY: &str = "SB-Mid-server-test";
pub const TEST_CLIENT_KEY: &str = "SB-Mid-client-test";
/// `Basic base64("SB-Mid-server-test:")`
pub const TEST_AUTHORIZATION: &str = "Basic U0ItTWlkLXNlcnZlci10ZXN0Og==";

pub fn test_config(snap_base_url: &str, api_base_url: &str) -> Config {
    Config {
        server: core_config::Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        midtrans: MidtransConfig {
            server_key: Secret::new(TEST_SERVER_KEY.to_string()),
            client_key: Secret::new(TEST_CLIENT_KEY.to_string()),
            environment: PaymentEnvironment::Sandbox,
            snap_base_url: snap_base_url.to_string(),
            api_base_url: api_base_url.to_string(),
            verify_signature: true,
        },
        service_name: "midtrans-service-test".to_string(),
    }
}

/// Config pointing both Midtrans APIs at a wiremock server.
pub fn mock_config(midtrans: &MockServer) -> Config {
    test_config(&format!("{}/snap", midtrans.uri()), &midtrans.uri())
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(midtrans: &MockServer) -> Self {
        Self::spawn_with_config(mock_config(midtrans)).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer the liveness probe
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Canned answer of a [`StubGateway`] call.
#[derive(Clone)]
pub enum Stubbed<T> {
    Ok(T),
    Fail(String),
}

impl<T: Clone> Stubbed<T> {
    fn resolve(&self) -> Result<T, GatewayError> {
        match self {
            Stubbed::Ok(value) => Ok(value.clone()),
            Stubbed::Fail(message) => Err(GatewayError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}

/// In-process payment gateway with fixed answers.
pub struct StubGateway {
    pub create: Stubbed<SnapTransaction>,
    pub verify: Stubbed<TransactionStatusResponse>,
    pub create_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_request: Mutex<Option<SnapTransactionRequest>>,
}

impl StubGateway {
    pub fn new(
        create: Stubbed<SnapTransaction>,
        verify: Stubbed<TransactionStatusResponse>,
    ) -> Arc<Self> {
        Arc::new(Self {
            create,
            verify,
            create_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn issuing(token: &str, redirect_url: &str) -> Arc<Self> {
        Self::new(
            Stubbed::Ok(SnapTransaction {
                token: token.to_string(),
                redirect_url: redirect_url.to_string(),
            }),
            Stubbed::Fail("verify_notification not stubbed".to_string()),
        )
    }

    pub fn resolving(order_id: &str, transaction_status: &str) -> Arc<Self> {
        Self::new(
            Stubbed::Fail("create_transaction not stubbed".to_string()),
            Stubbed::Ok(TransactionStatusResponse {
                status_code: Some("200".to_string()),
                order_id: Some(order_id.to_string()),
                transaction_status: Some(transaction_status.to_string().into()),
                payment_type: Some("bank_transfer".to_string()),
                fraud_status: Some("accept".to_string()),
                ..Default::default()
            }),
        )
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::new(
            Stubbed::Fail(message.to_string()),
            Stubbed::Fail(message.to_string()),
        )
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_transaction(
        &self,
        request: &SnapTransactionRequest,
    ) -> Result<SnapTransaction, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.create.resolve()
    }

    async fn verify_notification(
        &self,
        _payload: &Value,
    ) -> Result<TransactionStatusResponse, GatewayError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify.resolve()
    }
}

/// Collects formatted log lines written while its subscriber is the
/// default.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Number of lines containing every needle.
    pub fn count_lines(&self, needles: &[&str]) -> usize {
        self.contents()
            .lines()
            .filter(|line| needles.iter().all(|n| line.contains(n)))
            .count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
