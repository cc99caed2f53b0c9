use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

/// Server settings shared by every service: where to bind.
///
/// Read from `configuration.{toml,yaml,json}` when present, then from plain
/// environment variables (`HOST`, `PORT`).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Self::from_source(None)
    }

    /// Build from an explicit variable map instead of the process
    /// environment. `None` reads the real environment.
    pub fn from_source(source: Option<config::Map<String, String>>) -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().try_parsing(true).source(source))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
