use crate::config::settings::SecretBackend;
use crate::utils::error::{MuteError, Result};
use crate::utils::validation::{self, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional config file. Every section and key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub newrelic: Option<NewRelicSection>,
    pub secrets: Option<SecretsSection>,
    pub store: Option<StoreSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRelicSection {
    pub api_endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsSection {
    pub backend: Option<SecretBackend>,
    pub secret_id: Option<String>,
    pub region: Option<String>,
    pub env_var: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    pub path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MuteError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MuteError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MuteError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(newrelic) = &self.newrelic {
            if let Some(endpoint) = &newrelic.api_endpoint {
                validation::validate_url("newrelic.api_endpoint", endpoint)?;
            }
            if let Some(timeout) = newrelic.timeout_seconds {
                validation::validate_range("newrelic.timeout_seconds", timeout, 1, 300)?;
            }
        }

        if let Some(secrets) = &self.secrets {
            if let Some(secret_id) = &secrets.secret_id {
                validation::validate_non_empty_string("secrets.secret_id", secret_id)?;
            }
            if let Some(region) = &secrets.region {
                validation::validate_aws_region("secrets.region", region)?;
            }
        }

        if let Some(path) = self.store.as_ref().and_then(|s| s.path.as_ref()) {
            validation::validate_path("store.path", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[newrelic]
api_endpoint = "https://api.eu.newrelic.com/graphql"
timeout_seconds = 20

[secrets]
backend = "aws"
secret_id = "nr/prod"
region = "eu-central-1"

[store]
path = "/var/lib/mute-rules"
"#,
        )
        .unwrap();

        let newrelic = config.newrelic.as_ref().unwrap();
        assert_eq!(
            newrelic.api_endpoint.as_deref(),
            Some("https://api.eu.newrelic.com/graphql")
        );
        assert_eq!(config.secrets.as_ref().unwrap().backend, Some(SecretBackend::Aws));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.newrelic.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NEWRELIC_MUTE_TEST_ENDPOINT", "https://test.newrelic.local/graphql");

        let config = TomlConfig::from_toml_str(
            r#"
[newrelic]
api_endpoint = "${NEWRELIC_MUTE_TEST_ENDPOINT}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.newrelic.unwrap().api_endpoint.as_deref(),
            Some("https://test.newrelic.local/graphql")
        );

        std::env::remove_var("NEWRELIC_MUTE_TEST_ENDPOINT");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = TomlConfig::from_toml_str(
            r#"
[newrelic]
endpoint = "https://api.newrelic.com/graphql"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, MuteError::ConfigError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[newrelic]
api_endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[store]\npath = \"./records\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store.unwrap().path.as_deref(), Some("./records"));
    }
}
