pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, SecretBackend, Settings};

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

#[cfg(feature = "aws")]
pub use adapters::AwsSecretsManager;
pub use adapters::EnvSecretSource;

pub use core::{
    client::NewRelicClient, deployment::DeploymentRepository, engine::MuteRuleEngine,
    rule::NewRelicRule,
};
pub use domain::model::{Credentials, Deployment, MuteRule, MuteRuleAction, MuteRuleId, RunReport};
pub use utils::error::{MuteError, Result};
