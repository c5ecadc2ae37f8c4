//! Startup configuration for the risk engine.
//!
//! `artifact_path` has no default: where the model lives is a deployment
//! decision. Set it in the file named by `HEALTHIQ_CONFIG_FILE` or with
//! `HEALTHIQ__ARTIFACT_PATH`.

use crate::artifact::LoadOptions;
use crate::error::StartupError;
use healthiq_core::ConfigSources;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const SERVICE_NAME: &str = "risk-engine";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub artifact_path: PathBuf,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub model_sha256: Option<String>,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

impl ServiceConfig {
    pub fn load() -> Result<Self, StartupError> {
        Self::from_sources(&ConfigSources::from_env(SERVICE_NAME))
    }

    pub fn from_sources(sources: &ConfigSources<'_>) -> Result<Self, StartupError> {
        Ok(sources.load()?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            path: self.artifact_path.clone(),
            version: self.model_version.clone(),
            expected_sha256: self.model_sha256.clone(),
        }
    }
}
