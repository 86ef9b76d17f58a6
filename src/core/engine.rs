use crate::core::rule::NewRelicRule;
use crate::core::{MuteRuleAction, MuteRuleId, RunReport, StepOutcome, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;

/// Runs a [`MuteRuleAction`] against one deployment's rule.
///
/// Steps run in order and the first failure ends the run.
pub struct MuteRuleEngine<S: Storage> {
    rule: NewRelicRule<S>,
}

impl<S: Storage> MuteRuleEngine<S> {
    pub fn new(rule: NewRelicRule<S>) -> Self {
        Self { rule }
    }

    pub async fn run(mut self, action: &MuteRuleAction) -> Result<RunReport> {
        tracing::info!(
            action = action.name(),
            deployment_id = %self.rule.deployment().id,
            customer = %self.rule.deployment().customer_name,
            "Starting mute rule run"
        );

        let mut steps = Vec::new();
        match action {
            MuteRuleAction::Create => {
                steps.push(self.create().await?);
            }
            MuteRuleAction::Enable { rule_id } => {
                let id = self.resolve(rule_id)?;
                steps.push(self.toggle("enable", &id, true).await?);
            }
            MuteRuleAction::Disable { rule_id } => {
                let id = self.resolve(rule_id)?;
                steps.push(self.toggle("disable", &id, false).await?);
            }
            MuteRuleAction::Delete { rule_id } => {
                let id = self.resolve(rule_id)?;
                steps.push(self.delete(&id).await?);
            }
            MuteRuleAction::Cycle => {
                let created = self.create().await?;
                let id = created.rule_id.clone();
                steps.push(created);
                steps.push(self.toggle("disable", &id, false).await?);
                steps.push(self.toggle("enable", &id, true).await?);
            }
        }

        tracing::info!(action = action.name(), steps = steps.len(), "Mute rule run finished");
        Ok(RunReport {
            deployment_saved: self.rule.deployment_saved(),
            deployment: self.rule.into_deployment(),
            steps,
        })
    }

    fn resolve(&self, rule_id: &Option<MuteRuleId>) -> Result<MuteRuleId> {
        let id = match rule_id {
            Some(id) => id.clone(),
            None => self.rule.recorded_rule_id()?,
        };
        validate_non_empty_string("rule_id", id.as_str())?;
        Ok(id)
    }

    async fn create(&mut self) -> Result<StepOutcome> {
        let rule = self.rule.create_mute_rule().await.inspect_err(|e| {
            tracing::error!(step = "create", error = %e, "Mute rule step failed");
        })?;
        Ok(StepOutcome {
            step: "create",
            rule_id: rule.id,
            enabled: Some(rule.enabled),
        })
    }

    async fn toggle(&mut self, step: &'static str, id: &MuteRuleId, enabled: bool) -> Result<StepOutcome> {
        let rule = self
            .rule
            .toggle_mute_rule(id, enabled)
            .await
            .inspect_err(|e| tracing::error!(step, error = %e, "Mute rule step failed"))?;
        Ok(StepOutcome {
            step,
            rule_id: rule.id,
            enabled: Some(rule.enabled),
        })
    }

    async fn delete(&mut self, id: &MuteRuleId) -> Result<StepOutcome> {
        let rule_id = self
            .rule
            .delete_mute_rule(id)
            .await
            .inspect_err(|e| tracing::error!(step = "delete", error = %e, "Mute rule step failed"))?;
        Ok(StepOutcome {
            step: "delete",
            rule_id,
            enabled: None,
        })
    }
}
