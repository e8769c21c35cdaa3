use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::error::Result;

/// Name reported in log resources and the index payload.
pub const SERVICE_NAME: &str = "CloudOps Insight Platform";

/// Environment variables the service reads, lowercased the way figment keys them.
const ENV_KEYS: &[&str] = &[
    "port",
    "app_version",
    "node_env",
    "log_level",
    "log_format",
    "random_seed",
];

/// Runtime configuration, read from the process environment only.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub app_version: String,
    /// Deployment environment name, e.g. "development" or "production".
    pub node_env: String,
    pub log_level: String,
    pub log_format: String,
    /// Seed for the fault-injection randomness. Entropy-seeded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 3000,
            app_version: "1.0.0".to_string(),
            node_env: "development".to_string(),
            log_level: "info".to_string(),
            log_format: "console".to_string(),
            random_seed: None,
        }
    }
}

impl AppConfig {
    /// Logging settings derived from this configuration.
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            service_name: SERVICE_NAME.to_string(),
            service_version: self.app_version.clone(),
            environment: self.node_env.clone(),
        }
    }
}

/// Defaults overlaid with the recognised environment variables.
pub fn env_figment() -> Figment {
    Figment::from(Serialized::defaults(AppConfig::default())).merge(Env::raw().only(ENV_KEYS))
}

/// Extracts the configuration from the environment.
pub fn try_load_config() -> Result<AppConfig> {
    Ok(env_figment().extract::<AppConfig>()?)
}

/// Load config from the environment, exiting the process if it does not parse.
pub fn load_config() -> AppConfig {
    match try_load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}
