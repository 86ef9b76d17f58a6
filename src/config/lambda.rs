#[cfg(feature = "lambda")]
use crate::core::{ConfigProvider, Storage};
#[cfg(feature = "lambda")]
use crate::utils::error::{MuteError, Result};
#[cfg(feature = "lambda")]
use aws_sdk_s3::error::DisplayErrorContext;
#[cfg(feature = "lambda")]
use aws_sdk_s3::operation::get_object::GetObjectError;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use std::env;
#[cfg(feature = "lambda")]
use std::time::Duration;

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub api_endpoint: String,
    pub secret_id: String,
    pub secret_region: String,
    pub deployment_bucket: String,
    pub deployment_prefix: String,
    pub timeout_seconds: Option<u64>,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_endpoint: env::var("NEWRELIC_API_ENDPOINT")
                .unwrap_or_else(|_| crate::core::client::DEFAULT_GRAPHQL_ENDPOINT.to_string()),
            secret_id: env::var("NEWRELIC_SECRET_ID")
                .unwrap_or_else(|_| crate::core::secrets::DEFAULT_SECRET_ID.to_string()),
            secret_region: env::var("NEWRELIC_SECRET_REGION")
                .unwrap_or_else(|_| crate::core::secrets::DEFAULT_SECRET_REGION.to_string()),
            deployment_bucket: env::var("DEPLOYMENT_BUCKET").map_err(|_| {
                MuteError::MissingConfigError {
                    field: "DEPLOYMENT_BUCKET".to_string(),
                }
            })?,
            deployment_prefix: env::var("DEPLOYMENT_PREFIX")
                .unwrap_or_else(|_| "mute-rules".to_string()),
            timeout_seconds: match env::var("REQUEST_TIMEOUT_SECONDS") {
                Ok(raw) => Some(raw.parse().map_err(|_| MuteError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: "must be a whole number of seconds".to_string(),
                })?),
                Err(_) => None,
            },
        })
    }
}

#[cfg(feature = "lambda")]
impl ConfigProvider for LambdaConfig {
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

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_non_empty_string("secret_id", &self.secret_id)?;
        validate_aws_region("secret_region", &self.secret_region)?;
        validate_s3_bucket_name("deployment_bucket", &self.deployment_bucket)?;
        validate_non_empty_string("deployment_prefix", &self.deployment_prefix)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 300)?;
        }

        tracing::info!("Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "lambda")]
fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| MuteError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

/// Deployment records stored as objects under `prefix/` in one bucket.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn key(&self, path: &str) -> String {
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", prefix, path)
        }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let key = self.key(path);
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                let message = format!("Failed to read s3://{}/{}: {}", self.bucket, key, DisplayErrorContext(&err));
                return match err.into_service_error() {
                    GetObjectError::NoSuchKey(_) => Ok(None),
                    _ => Err(MuteError::StorageError { message }),
                };
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| MuteError::StorageError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(Some(data.into_bytes().to_vec()))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| MuteError::StorageError {
                message: format!(
                    "Failed to write s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ),
            })?;
        Ok(())
    }
}

#[cfg(all(test, feature = "lambda"))]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_are_checked() {
        assert!(validate_s3_bucket_name("bucket", "mute-rules.prod").is_ok());
        assert!(validate_s3_bucket_name("bucket", "ab").is_err());
        assert!(validate_s3_bucket_name("bucket", "Upper").is_err());
        assert!(validate_s3_bucket_name("bucket", "-leading").is_err());
    }
}
