use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::strategies::DispatchLimits;

const ENV_PREFIX: &str = "PAYMENT_ROUTER";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub dispatch: DispatchLimits,
    pub log_level: String
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProcessorConfig {
    /// Base URL of the remote payment processor.
    pub url: String,
    pub connection_pool_size: usize
}

impl Config {
    /// Loads defaults, then `config/default` and `config/local` if present,
    /// then `PAYMENT_ROUTER__*` environment variables (e.g. `PAYMENT_ROUTER__PROCESSOR__URL`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Builds the configuration from defaults overlaid with an inline TOML document.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let limits = DispatchLimits::default();

        config::Config::builder()
            .set_default("server.port", 8080_i64)?
            .set_default("processor.connection_pool_size", 5000_i64)?
            .set_default("dispatch.fixed_pool_size", limits.fixed_pool_size as i64)?
            .set_default("dispatch.merge_max_in_flight", limits.merge_max_in_flight as i64)?
            .set_default("dispatch.cooperative_permits", limits.cooperative_permits as i64)?
            .set_default("dispatch.lightweight_thread_permits", limits.lightweight_thread_permits as i64)?
            .set_default("log_level", "info")
    }
}
