use clap::Parser;
use newrelic_mute::core::SecretSource;
use newrelic_mute::utils::error::ErrorSeverity;
use newrelic_mute::utils::validation::{validate_non_empty_string, Validate};
use newrelic_mute::utils::logger;
use newrelic_mute::{
    CliConfig, DeploymentRepository, EnvSecretSource, LocalStorage, MuteRuleEngine, NewRelicRule,
    RunReport, SecretBackend, Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.log_format, cli.verbose);

    tracing::info!("Starting newrelic-mute CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli).and_then(|settings| {
        settings.validate()?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match execute(&cli, &settings).await {
        Ok(report) => {
            for step in &report.steps {
                let state = match step.enabled {
                    Some(true) => "enabled",
                    Some(false) => "disabled",
                    None => "removed",
                };
                println!("✅ {}: mute rule {} {}", step.step, step.rule_id, state);
            }
            if report.deployment_saved {
                println!(
                    "📁 Deployment {} saved under {}",
                    report.deployment.id, settings.store_path
                );
            } else {
                println!("📁 Deployment {} left unchanged", report.deployment.id);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Mute rule run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!(
                "❌ There's an error with the mute rule for this deployment: {}",
                e.user_friendly_message()
            );
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn execute(cli: &CliConfig, settings: &Settings) -> newrelic_mute::Result<RunReport> {
    let args = cli.command.deployment();
    validate_non_empty_string("customer_name", &args.customer_name)?;

    let secrets = secret_source(settings).await?;
    let repository = DeploymentRepository::new(LocalStorage::new(&settings.store_path));
    let deployment = repository
        .load_or_new(&args.deployment_id, &args.customer_name)
        .await?;

    let rule = NewRelicRule::connect(secrets.as_ref(), settings, repository, deployment).await?;
    MuteRuleEngine::new(rule).run(&cli.command.action()).await
}

async fn secret_source(settings: &Settings) -> newrelic_mute::Result<Box<dyn SecretSource>> {
    match settings.secret_backend {
        SecretBackend::Env => Ok(Box::new(EnvSecretSource::new(&settings.secret_env))),
        #[cfg(feature = "aws")]
        SecretBackend::Aws => Ok(Box::new(
            newrelic_mute::AwsSecretsManager::from_env(&settings.secret_region).await,
        )),
        #[cfg(not(feature = "aws"))]
        SecretBackend::Aws => Err(newrelic_mute::MuteError::ConfigError {
            message: "built without the `aws` feature; use --secret-source env".to_string(),
        }),
    }
}
