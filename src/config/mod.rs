pub mod cli;
pub mod lambda;
pub mod settings;
pub mod toml_config;

pub use settings::{SecretBackend, Settings};

#[cfg(feature = "cli")]
use crate::core::{MuteRuleAction, MuteRuleId};
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "newrelic-mute")]
#[command(about = "Create and toggle New Relic alert mute rules for customer deployments")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML config file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "New Relic GraphQL endpoint")]
    pub api_endpoint: Option<String>,

    #[arg(long, global = true, help = "Name of the secret holding ACCOUNT and API_KEY")]
    pub secret_id: Option<String>,

    #[arg(long, global = true, help = "AWS region of the secret")]
    pub region: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub secret_source: Option<SecretBackend>,

    #[arg(long, global = true, help = "Directory holding deployment records")]
    pub store_path: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the customer's mute rule (enabled) and record it on the deployment
    Create(DeploymentArgs),
    /// Enable a mute rule
    Enable(RuleArgs),
    /// Disable a mute rule
    Disable(RuleArgs),
    /// Delete a mute rule
    Delete(RuleArgs),
    /// Create a rule, disable it, then enable it again
    Cycle(DeploymentArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct DeploymentArgs {
    #[arg(long)]
    pub deployment_id: String,

    #[arg(long)]
    pub customer_name: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct RuleArgs {
    #[command(flatten)]
    pub deployment: DeploymentArgs,

    #[arg(long, help = "Defaults to the rule recorded on the deployment")]
    pub rule_id: Option<String>,
}

#[cfg(feature = "cli")]
impl Command {
    pub fn deployment(&self) -> &DeploymentArgs {
        match self {
            Self::Create(args) | Self::Cycle(args) => args,
            Self::Enable(args) | Self::Disable(args) | Self::Delete(args) => &args.deployment,
        }
    }

    pub fn action(&self) -> MuteRuleAction {
        let rule_id = |args: &RuleArgs| args.rule_id.as_deref().map(MuteRuleId::from);
        match self {
            Self::Create(_) => MuteRuleAction::Create,
            Self::Cycle(_) => MuteRuleAction::Cycle,
            Self::Enable(args) => MuteRuleAction::Enable {
                rule_id: rule_id(args),
            },
            Self::Disable(args) => MuteRuleAction::Disable {
                rule_id: rule_id(args),
            },
            Self::Delete(args) => MuteRuleAction::Delete {
                rule_id: rule_id(args),
            },
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn parses_disable_with_rule_id() {
        let cli = CliConfig::try_parse_from([
            "newrelic-mute",
            "disable",
            "--deployment-id",
            "acme-prod",
            "--customer-name",
            "Acme",
            "--rule-id",
            "42",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert_eq!(cli.command.deployment().deployment_id, "acme-prod");
        assert_eq!(
            cli.command.action(),
            MuteRuleAction::Disable {
                rule_id: Some(MuteRuleId::new("42"))
            }
        );
    }

    #[test]
    fn global_flags_before_subcommand() {
        let cli = CliConfig::try_parse_from([
            "newrelic-mute",
            "--secret-source",
            "env",
            "--timeout-seconds",
            "10",
            "--log-format",
            "json",
            "cycle",
            "--deployment-id",
            "d1",
            "--customer-name",
            "Acme",
        ])
        .unwrap();

        assert_eq!(cli.secret_source, Some(SecretBackend::Env));
        assert_eq!(cli.timeout_seconds, Some(10));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.command.action(), MuteRuleAction::Cycle);
    }

    #[test]
    fn customer_name_is_required() {
        assert!(CliConfig::try_parse_from(["newrelic-mute", "create", "--deployment-id", "d1"])
            .is_err());
    }
}
