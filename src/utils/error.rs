use crate::domain::model::MuteRuleId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MuteError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Secret retrieval failed: {message}")]
    SecretError { message: String },

    #[error("Query failed to run by returning code of {status}")]
    QueryFailed { status: u16, body: String },

    #[error("GraphQL request returned errors: {}", messages.join("; "))]
    GraphQlError { messages: Vec<String> },

    #[error("Unexpected response shape: missing {path}")]
    ResponseShapeError { path: String },

    #[error("No mute rule recorded for deployment {deployment_id}")]
    MissingRuleId { deployment_id: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Mute rule {rule_id} was created but could not be recorded: {source}")]
    RulePersistFailed {
        rule_id: MuteRuleId,
        #[source]
        source: Box<MuteError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Secrets,
    Network,
    RemoteApi,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MuteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::StorageError { .. } | Self::RulePersistFailed { .. } => {
                ErrorCategory::Storage
            }
            Self::SerializationError(_) | Self::ResponseShapeError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingRuleId { .. } => ErrorCategory::Configuration,
            Self::SecretError { .. } => ErrorCategory::Secrets,
            Self::QueryFailed { .. } | Self::GraphQlError { .. } => ErrorCategory::RemoteApi,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::RemoteApi => match self {
                // server-side or throttled
                Self::QueryFailed { status, .. } if *status >= 500 || *status == 429 => {
                    ErrorSeverity::Medium
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Secrets | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Could not reach the New Relic GraphQL API".to_string(),
            Self::QueryFailed { status, .. } => {
                format!("New Relic rejected the mutation (HTTP {})", status)
            }
            Self::GraphQlError { messages } => {
                format!("New Relic reported: {}", messages.join("; "))
            }
            Self::SecretError { .. } => "Could not load New Relic credentials".to_string(),
            Self::MissingRuleId { deployment_id } => format!(
                "Deployment {} has no mute rule yet; pass --rule-id or run create first",
                deployment_id
            ),
            Self::RulePersistFailed { rule_id, .. } => format!(
                "Mute rule {} exists in New Relic but is not recorded on the deployment",
                rule_id
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network access to api.newrelic.com and retry",
            ErrorCategory::RemoteApi => "Please visit the New Relic UI to verify the mute rule",
            ErrorCategory::Secrets => {
                "Verify the secret exists and holds a JSON object with ACCOUNT and API_KEY"
            }
            ErrorCategory::Configuration => "Review the command line flags and config file",
            ErrorCategory::Storage => "Check the deployment store path or bucket permissions",
            ErrorCategory::Data => "The response was not understood; inspect it with --verbose",
        }
    }
}

pub type Result<T> = std::result::Result<T, MuteError>;
