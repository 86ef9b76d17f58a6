use crate::adapters::secrets::DEFAULT_SECRET_ENV;
use crate::config::toml_config::TomlConfig;
use crate::core::client::DEFAULT_GRAPHQL_ENDPOINT;
use crate::core::secrets::{DEFAULT_SECRET_ID, DEFAULT_SECRET_REGION};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "./data";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// AWS Secrets Manager
    #[default]
    Aws,
    /// JSON payload in an environment variable
    Env,
}

/// Effective settings for a CLI run: built-in defaults, then the TOML file,
/// then command line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_endpoint: String,
    pub secret_id: String,
    pub secret_region: String,
    pub secret_backend: SecretBackend,
    pub secret_env: String,
    pub store_path: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            secret_id: DEFAULT_SECRET_ID.to_string(),
            secret_region: DEFAULT_SECRET_REGION.to_string(),
            secret_backend: SecretBackend::default(),
            secret_env: DEFAULT_SECRET_ENV.to_string(),
            store_path: DEFAULT_STORE_PATH.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Settings {
    pub fn with_file(mut self, file: &TomlConfig) -> Self {
        if let Some(newrelic) = &file.newrelic {
            if let Some(endpoint) = &newrelic.api_endpoint {
                self.api_endpoint = endpoint.clone();
            }
            if newrelic.timeout_seconds.is_some() {
                self.timeout_seconds = newrelic.timeout_seconds;
            }
        }
        if let Some(secrets) = &file.secrets {
            if let Some(backend) = secrets.backend {
                self.secret_backend = backend;
            }
            if let Some(secret_id) = &secrets.secret_id {
                self.secret_id = secret_id.clone();
            }
            if let Some(region) = &secrets.region {
                self.secret_region = region.clone();
            }
            if let Some(env_var) = &secrets.env_var {
                self.secret_env = env_var.clone();
            }
        }
        if let Some(path) = file.store.as_ref().and_then(|s| s.path.as_ref()) {
            self.store_path = path.clone();
        }
        self
    }

    #[cfg(feature = "cli")]
    pub fn with_cli(mut self, cli: &crate::config::CliConfig) -> Self {
        if let Some(endpoint) = &cli.api_endpoint {
            self.api_endpoint = endpoint.clone();
        }
        if let Some(secret_id) = &cli.secret_id {
            self.secret_id = secret_id.clone();
        }
        if let Some(region) = &cli.region {
            self.secret_region = region.clone();
        }
        if let Some(backend) = cli.secret_source {
            self.secret_backend = backend;
        }
        if let Some(path) = &cli.store_path {
            self.store_path = path.clone();
        }
        if cli.timeout_seconds.is_some() {
            self.timeout_seconds = cli.timeout_seconds;
        }
        self
    }

    /// Resolve settings for a CLI invocation, reading `--config` if given.
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &crate::config::CliConfig) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(path) = &cli.config {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            settings = settings.with_file(&file);
        }
        Ok(settings.with_cli(cli))
    }
}

impl ConfigProvider for Settings {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn secret_id(&self) -> &str {
        &self.secret_id
    }

    fn secret_region(&self) -> &str {
        &self.secret_region
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_non_empty_string("secret_id", &self.secret_id)?;
        match self.secret_backend {
            SecretBackend::Aws => validation::validate_aws_region("region", &self.secret_region)?,
            SecretBackend::Env => validation::validate_non_empty_string("secret_env", &self.secret_env)?,
        }
        validation::validate_path("store_path", &self.store_path)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 300)?;
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
