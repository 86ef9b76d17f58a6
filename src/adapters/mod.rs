// Adapters layer: concrete implementations for external systems.

pub mod secrets;

#[cfg(feature = "aws")]
pub use secrets::AwsSecretsManager;
pub use secrets::EnvSecretSource;
