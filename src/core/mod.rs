pub mod client;
pub mod deployment;
pub mod engine;
pub mod mutation;
pub mod rule;
pub mod secrets;

pub use crate::domain::model::{
    Credentials, Deployment, MuteRule, MuteRuleAction, MuteRuleId, RunReport, StepOutcome,
};
pub use crate::domain::ports::{ConfigProvider, SecretSource, Storage};
pub use crate::utils::error::Result;
