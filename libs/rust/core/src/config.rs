//! Layered configuration: serde defaults, then an optional file, then an
//! inline YAML overlay, then `HEALTHIQ__*` environment variables.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Names a config file (YAML, JSON or TOML by extension).
pub const CONFIG_FILE_ENV: &str = "HEALTHIQ_CONFIG_FILE";
/// `HEALTHIQ__ARTIFACT_PATH` maps to `artifact_path`.
pub const ENV_PREFIX: &str = "HEALTHIQ";

#[derive(Debug, Clone)]
pub struct ConfigSources<'a> {
    pub service: &'a str,
    pub env_prefix: &'a str,
    pub file: Option<PathBuf>,
    pub overlay: Option<&'a str>,
}

impl<'a> ConfigSources<'a> {
    /// Sources as seen by a running process.
    pub fn from_env(service: &'a str) -> Self {
        Self {
            service,
            env_prefix: ENV_PREFIX,
            file: std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from),
            overlay: None,
        }
    }

    pub fn load<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let mut builder = Config::builder().set_default("service_name", self.service)?;
        // An explicitly named file that is missing is an error, not a silent default.
        if let Some(path) = &self.file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }
        if let Some(text) = self.overlay {
            builder = builder.add_source(File::from_str(text, FileFormat::Yaml));
        }
        builder = builder.add_source(Environment::with_prefix(self.env_prefix).separator("__"));
        builder.build()?.try_deserialize()
    }
}

pub fn load_config<T: DeserializeOwned>(service: &str) -> Result<T, ConfigError> {
    ConfigSources::from_env(service).load()
}
