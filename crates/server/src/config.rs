//! Server configuration

use anyhow::Result;
use estimator_lib::DEFAULT_ARTIFACT_PATH;
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen port for the prediction/health API
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Path to the trained model artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
}

fn default_api_port() -> u16 {
    5000
}

fn default_artifact_path() -> String {
    DEFAULT_ARTIFACT_PATH.to_string()
}

impl ServerConfig {
    /// Load configuration from the environment (`FEED_` prefix)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("FEED"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            api_port: default_api_port(),
            artifact_path: default_artifact_path(),
        }))
    }
}
