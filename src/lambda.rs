#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use newrelic_mute::core::StepOutcome;
#[cfg(feature = "lambda")]
use newrelic_mute::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use newrelic_mute::{
    AwsSecretsManager, DeploymentRepository, LambdaConfig, MuteRuleAction, MuteRuleEngine,
    MuteRuleId, NewRelicRule, S3Storage,
};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub deployment_id: String,
    pub customer_name: String,
    #[serde(flatten)]
    pub action: MuteRuleAction,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub deployment_id: String,
    pub mute_rule_id: Option<MuteRuleId>,
    pub steps: Vec<StepOutcome>,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let request = event.payload;
    tracing::info!(
        deployment_id = %request.deployment_id,
        action = request.action.name(),
        "Starting mute rule Lambda function"
    );

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let storage = S3Storage::new(
        S3Client::new(&config),
        lambda_config.deployment_bucket.clone(),
        lambda_config.deployment_prefix.clone(),
    );
    let secrets = AwsSecretsManager::from_env(&lambda_config.secret_region).await;

    let repository = DeploymentRepository::new(storage);
    let deployment = repository
        .load_or_new(&request.deployment_id, &request.customer_name)
        .await?;

    let rule = NewRelicRule::connect(&secrets, &lambda_config, repository, deployment).await?;
    let report = MuteRuleEngine::new(rule).run(&request.action).await?;

    tracing::info!(
        deployment_id = %report.deployment.id,
        steps = report.steps.len(),
        "Mute rule Lambda function completed"
    );
    Ok(Response {
        message: format!("{} completed", request.action.name()),
        deployment_id: report.deployment.id,
        mute_rule_id: report.deployment.mute_rule_id,
        steps: report.steps,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}

#[cfg(all(test, feature = "lambda"))]
mod tests {
    use super::*;

    #[test]
    fn disable_event_carries_explicit_rule_id() {
        let request: Request = serde_json::from_str(
            r#"{"deployment_id": "d1", "customer_name": "Acme", "action": "disable", "rule_id": "42"}"#,
        )
        .unwrap();

        assert_eq!(request.deployment_id, "d1");
        assert_eq!(request.customer_name, "Acme");
        assert_eq!(
            request.action,
            MuteRuleAction::Disable {
                rule_id: Some(MuteRuleId::new("42"))
            }
        );
    }

    #[test]
    fn enable_event_without_rule_id_uses_recorded_rule() {
        let request: Request = serde_json::from_str(
            r#"{"deployment_id": "d1", "customer_name": "Acme", "action": "enable"}"#,
        )
        .unwrap();

        assert_eq!(request.action, MuteRuleAction::Enable { rule_id: None });
    }

    #[test]
    fn bare_cycle_event() {
        let request: Request = serde_json::from_str(
            r#"{"deployment_id": "d1", "customer_name": "Acme", "action": "cycle"}"#,
        )
        .unwrap();

        assert_eq!(request.action, MuteRuleAction::Cycle);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result = serde_json::from_str::<Request>(
            r#"{"deployment_id": "d1", "customer_name": "Acme", "action": "mute"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn response_serializes_steps() {
        let response = Response {
            message: "create completed".to_string(),
            deployment_id: "d1".to_string(),
            mute_rule_id: Some(MuteRuleId::new("7")),
            steps: vec![StepOutcome {
                step: "create",
                rule_id: MuteRuleId::new("7"),
                enabled: Some(true),
            }],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["mute_rule_id"], "7");
        assert_eq!(value["steps"][0]["step"], "create");
        assert_eq!(value["steps"][0]["enabled"], true);
    }
}
