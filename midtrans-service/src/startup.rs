//! Application startup and lifecycle management.

use crate::config::Config;
use crate::handlers;
use crate::services::{MidtransClient, PaymentGateway, TransactionGatewayAdapter};
use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{http_request_span, request_context_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub adapter: TransactionGatewayAdapter,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            config,
            adapter: TransactionGatewayAdapter::new(gateway),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/createTransaction",
            post(handlers::transactions::create_transaction),
        )
        .route(
            "/notification",
            post(handlers::notifications::notification),
        )
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span::<Body>))
        .layer(from_fn(request_context_middleware))
        .layer(cors)
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the real Midtrans API.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        if !config.midtrans.has_credentials() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Midtrans server and client keys must both be set"
            )));
        }

        let midtrans = MidtransClient::new(config.midtrans.clone());
        if midtrans.environment().is_production() {
            tracing::info!("Midtrans client initialized (production)");
        } else {
            tracing::warn!(
                "Midtrans client initialized in sandbox mode - set MIDTRANS_ENVIRONMENT=production for live payments"
            );
        }

        Self::build_with_gateway(config, Arc::new(midtrans)).await
    }

    /// Build the application with any payment gateway implementation.
    pub async fn build_with_gateway(
        config: Config,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, AppError> {
        let host = config.server.host.clone();
        let state = AppState::new(config.clone(), gateway);

        // Port 0 binds a random port (tests)
        let listener = TcpListener::bind((host.as_str(), config.server.port))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to bind HTTP listener to {}:{}: {}",
                    host,
                    config.server.port,
                    e
                );
                AppError::from(e)
            })?;
        let port = listener.local_addr()?.port();

        tracing::info!("{} listening on {}:{}", config.service_name, host, port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve requests until Ctrl-C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
