use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::fmt;
use std::str::FromStr;

pub const SERVER_KEY_VAR: &str = "MIDTRANS_SERVER_KEY";
pub const CLIENT_KEY_VAR: &str = "MIDTRANS_CLIENT_KEY";

#[derive(Clone, Debug)]
pub struct Config {
    pub server: core_config::Config,
    pub midtrans: MidtransConfig,
    pub service_name: String,
}

#[derive(Clone, Debug)]
pub struct MidtransConfig {
    pub server_key: Secret<String>,
    pub client_key: Secret<String>,
    pub environment: PaymentEnvironment,
    /// Snap base URL, without the trailing `/v1/transactions`.
    pub snap_base_url: String,
    /// Core API base URL, without the trailing `/v2/...`.
    pub api_base_url: String,
    /// Check `signature_key` on inbound notifications that carry one.
    pub verify_signature: bool,
}

/// Which Midtrans environment the credentials belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl PaymentEnvironment {
    pub fn snap_base_url(&self) -> &'static str {
        match self {
            PaymentEnvironment::Sandbox => "https://app.sandbox.midtrans.com/snap",
            PaymentEnvironment::Production => "https://app.midtrans.com/snap",
        }
    }

    pub fn api_base_url(&self) -> &'static str {
        match self {
            PaymentEnvironment::Sandbox => "https://api.sandbox.midtrans.com",
            PaymentEnvironment::Production => "https://api.midtrans.com",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, PaymentEnvironment::Production)
    }
}

impl FromStr for PaymentEnvironment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PaymentEnvironment::Sandbox),
            "production" => Ok(PaymentEnvironment::Production),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "MIDTRANS_ENVIRONMENT must be 'sandbox' or 'production', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PaymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentEnvironment::Sandbox => f.write_str("sandbox"),
            PaymentEnvironment::Production => f.write_str("production"),
        }
    }
}

impl Config {
    /// Load and validate the whole configuration. Fails before anything is
    /// bound when a Midtrans credential is missing.
    /// Reads the process environment only; `main` loads `.env` first.
    pub fn load() -> Result<Self, AppError> {
        let server = core_config::Config::load()?;
        let midtrans = MidtransConfig::from_lookup(|key| std::env::var(key).ok())?;

        Ok(Self {
            server,
            midtrans,
            service_name: "midtrans-service".to_string(),
        })
    }
}

impl MidtransConfig {
    /// Build from any variable source; `lookup` returns `None` for unset
    /// variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_key = required(&lookup, SERVER_KEY_VAR)?;
        let client_key = required(&lookup, CLIENT_KEY_VAR)?;

        let environment = match lookup("MIDTRANS_ENVIRONMENT") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => PaymentEnvironment::default(),
        };

        let snap_base_url = lookup("MIDTRANS_SNAP_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| environment.snap_base_url().to_string());
        let api_base_url = lookup("MIDTRANS_API_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| environment.api_base_url().to_string());

        let verify_signature = match lookup("MIDTRANS_VERIFY_SIGNATURE") {
            Some(value) => value.trim().parse().map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!(
                    "MIDTRANS_VERIFY_SIGNATURE must be 'true' or 'false', got '{}'",
                    value
                ))
            })?,
            None => true,
        };

        Ok(Self {
            server_key: Secret::new(server_key),
            client_key: Secret::new(client_key),
            environment,
            snap_base_url: snap_base_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            verify_signature,
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.server_key.expose_secret().is_empty() && !self.client_key.expose_secret().is_empty()
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) if !val.is_empty() => Ok(val),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}
