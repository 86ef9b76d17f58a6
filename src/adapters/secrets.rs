use crate::core::SecretSource;
use crate::utils::error::{MuteError, Result};
use async_trait::async_trait;

pub const DEFAULT_SECRET_ENV: &str = "NEWRELIC_SECRETS";

/// Reads the secret payload from an environment variable instead of AWS.
/// The secret id is only used in error messages.
#[derive(Debug, Clone)]
pub struct EnvSecretSource {
    variable: String,
}

impl EnvSecretSource {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_ENV)
    }
}

#[async_trait]
impl SecretSource for EnvSecretSource {
    async fn fetch_secret(&self, secret_id: &str) -> Result<String> {
        std::env::var(&self.variable).map_err(|_| MuteError::SecretError {
            message: format!(
                "environment variable {} is not set (looking for secret {})",
                self.variable, secret_id
            ),
        })
    }
}

#[cfg(feature = "aws")]
pub use aws::AwsSecretsManager;

#[cfg(feature = "aws")]
mod aws {
    use super::*;
    use aws_config::BehaviorVersion;
    use aws_sdk_secretsmanager::config::Region;
    use aws_sdk_secretsmanager::error::DisplayErrorContext;
    use aws_sdk_secretsmanager::Client as SecretsManagerClient;

    /// AWS Secrets Manager backed [`SecretSource`].
    #[derive(Debug, Clone)]
    pub struct AwsSecretsManager {
        client: SecretsManagerClient,
    }

    impl AwsSecretsManager {
        pub fn new(client: SecretsManagerClient) -> Self {
            Self { client }
        }

        /// Build a client from the default credential chain (env, `~/.aws`,
        /// instance/task role) pinned to `region`.
        pub async fn from_env(region: &str) -> Self {
            let config = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load()
                .await;
            Self::new(SecretsManagerClient::new(&config))
        }
    }

    #[async_trait]
    impl SecretSource for AwsSecretsManager {
        async fn fetch_secret(&self, secret_id: &str) -> Result<String> {
            let output = self
                .client
                .get_secret_value()
                .secret_id(secret_id)
                .send()
                .await
                .map_err(|e| MuteError::SecretError {
                    message: format!(
                        "GetSecretValue for {} failed: {}",
                        secret_id,
                        DisplayErrorContext(&e)
                    ),
                })?;

            output
                .secret_string()
                .map(str::to_string)
                .ok_or_else(|| MuteError::SecretError {
                    message: format!("secret {} has no SecretString", secret_id),
                })
        }
    }
}
