use crate::core::client::NewRelicClient;
use crate::core::deployment::DeploymentRepository;
use crate::core::secrets::newrelic_session;
use crate::core::{ConfigProvider, Deployment, MuteRule, MuteRuleId, SecretSource, Storage};
use crate::utils::error::{MuteError, Result};

/// Manages the mute rule attached to one deployment.
pub struct NewRelicRule<S: Storage> {
    client: NewRelicClient,
    deployments: DeploymentRepository<S>,
    deployment: Deployment,
    saved: bool,
}

impl<S: Storage> NewRelicRule<S> {
    /// Load credentials from `secrets` and build the GraphQL client.
    ///
    /// Fails before any request is sent when the secret is missing or malformed.
    pub async fn connect<Src, C>(
        secrets: &Src,
        config: &C,
        deployments: DeploymentRepository<S>,
        deployment: Deployment,
    ) -> Result<Self>
    where
        Src: SecretSource + ?Sized,
        C: ConfigProvider,
    {
        let credentials = newrelic_session(secrets, config.secret_id()).await?;
        let client = NewRelicClient::new(
            config.api_endpoint(),
            &credentials,
            config.request_timeout(),
        )?;
        Ok(Self::from_parts(client, deployments, deployment))
    }

    pub fn from_parts(
        client: NewRelicClient,
        deployments: DeploymentRepository<S>,
        deployment: Deployment,
    ) -> Self {
        Self {
            client,
            deployments,
            deployment,
            saved: false,
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Whether any call so far wrote the deployment record.
    pub fn deployment_saved(&self) -> bool {
        self.saved
    }

    pub fn into_deployment(self) -> Deployment {
        self.deployment
    }

    async fn save_deployment(&mut self) -> Result<()> {
        self.deployments.save(&mut self.deployment).await?;
        self.saved = true;
        Ok(())
    }

    /// Rule id recorded on the deployment by a previous create.
    pub fn recorded_rule_id(&self) -> Result<MuteRuleId> {
        self.deployment
            .mute_rule_id
            .clone()
            .ok_or_else(|| MuteError::MissingRuleId {
                deployment_id: self.deployment.id.clone(),
            })
    }

    /// Create the customer's mute rule and record its id on the deployment.
    pub async fn create_mute_rule(&mut self) -> Result<MuteRule> {
        let customer = self.deployment.customer_name.clone();
        if let Some(existing) = &self.deployment.mute_rule_id {
            tracing::warn!(
                deployment_id = %self.deployment.id,
                existing = %existing,
                "Deployment already has a mute rule; the new one will replace it on the record"
            );
        }

        let rule = self.client.create_mute_rule(&customer).await?;

        self.deployment.mute_rule_id = Some(rule.id.clone());
        self.deployment.mute_rule_enabled = Some(rule.enabled);
        if let Err(e) = self.save_deployment().await {
            return Err(MuteError::RulePersistFailed {
                rule_id: rule.id,
                source: Box::new(e),
            });
        }

        tracing::info!(
            customer = %customer,
            deployment_id = %self.deployment.id,
            rule_id = %rule.id,
            "Mute rule created"
        );
        Ok(rule)
    }

    pub async fn toggle_mute_rule(&mut self, rule_id: &MuteRuleId, enabled: bool) -> Result<MuteRule> {
        let rule = self.client.toggle_mute_rule(rule_id, enabled).await?;

        if self.deployment.owns_rule(rule_id) {
            self.deployment.mute_rule_enabled = Some(rule.enabled);
            self.save_deployment().await?;
        }

        tracing::info!(rule_id = %rule.id, enabled = rule.enabled, "Mute rule toggled");
        Ok(rule)
    }

    pub async fn delete_mute_rule(&mut self, rule_id: &MuteRuleId) -> Result<MuteRuleId> {
        let deleted = self.client.delete_mute_rule(rule_id).await?;

        if self.deployment.owns_rule(rule_id) {
            self.deployment.mute_rule_id = None;
            self.deployment.mute_rule_enabled = None;
            self.save_deployment().await?;
        }

        tracing::info!(rule_id = %deleted, "Mute rule deleted");
        Ok(deleted)
    }
}
