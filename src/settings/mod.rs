mod app_config;

pub use app_config::{Config, ProcessorConfig, ServerConfig};
