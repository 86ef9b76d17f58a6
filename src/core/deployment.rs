use crate::core::{Deployment, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_record_id;
use chrono::Utc;

const DEPLOYMENT_DIR: &str = "deployments";

/// Deployment records kept as JSON documents in a [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct DeploymentRepository<S: Storage> {
    storage: S,
}

impl<S: Storage> DeploymentRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn record_path(id: &str) -> Result<String> {
        validate_record_id("deployment_id", id)?;
        Ok(format!("{}/{}.json", DEPLOYMENT_DIR, id))
    }

    pub async fn load(&self, id: &str) -> Result<Option<Deployment>> {
        let path = Self::record_path(id)?;
        match self.storage.read_file(&path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the stored record, or start a fresh one for `customer_name`.
    /// A stored record keeps its own customer name.
    pub async fn load_or_new(&self, id: &str, customer_name: &str) -> Result<Deployment> {
        match self.load(id).await? {
            Some(deployment) => {
                if deployment.customer_name != customer_name {
                    tracing::warn!(
                        deployment_id = id,
                        stored = %deployment.customer_name,
                        requested = customer_name,
                        "Customer name differs from the stored deployment; keeping the stored one"
                    );
                }
                Ok(deployment)
            }
            None => {
                tracing::debug!(deployment_id = id, "No stored deployment, starting a new record");
                Ok(Deployment::new(id, customer_name))
            }
        }
    }

    pub async fn save(&self, deployment: &mut Deployment) -> Result<()> {
        let path = Self::record_path(&deployment.id)?;
        deployment.updated_at = Some(Utc::now());
        let data = serde_json::to_vec_pretty(deployment)?;
        self.storage.write_file(&path, &data).await?;
        tracing::debug!(deployment_id = %deployment.id, path = %path, "Deployment saved");
        Ok(())
    }
}
