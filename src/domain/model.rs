use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// New Relic account id and user API key, as stored in the secrets backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MuteRuleId(String);

impl MuteRuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MuteRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MuteRuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteRule {
    pub id: MuteRuleId,
    pub name: Option<String>,
    pub enabled: bool,
}

/// Customer deployment record the mute rule is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub customer_name: String,
    #[serde(default)]
    pub mute_rule_id: Option<MuteRuleId>,
    #[serde(default)]
    pub mute_rule_enabled: Option<bool>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deployment {
    pub fn new(id: impl Into<String>, customer_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            customer_name: customer_name.into(),
            mute_rule_id: None,
            mute_rule_enabled: None,
            updated_at: None,
        }
    }

    pub fn owns_rule(&self, rule_id: &MuteRuleId) -> bool {
        self.mute_rule_id.as_ref() == Some(rule_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum MuteRuleAction {
    Create,
    Enable {
        #[serde(default)]
        rule_id: Option<MuteRuleId>,
    },
    Disable {
        #[serde(default)]
        rule_id: Option<MuteRuleId>,
    },
    Delete {
        #[serde(default)]
        rule_id: Option<MuteRuleId>,
    },
    /// Create, then disable, then re-enable.
    Cycle,
}

impl MuteRuleAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Enable { .. } => "enable",
            Self::Disable { .. } => "disable",
            Self::Delete { .. } => "delete",
            Self::Cycle => "cycle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: &'static str,
    pub rule_id: MuteRuleId,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub deployment: Deployment,
    /// False when no step wrote the deployment record.
    pub deployment_saved: bool,
    pub steps: Vec<StepOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_api_key() {
        let credentials = Credentials {
            account_id: "1234567".to_string(),
            api_key: "NRAK-SECRET".to_string(),
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("1234567"));
        assert!(!rendered.contains("NRAK-SECRET"));
    }

    #[test]
    fn action_deserializes_from_tagged_json() {
        let action: MuteRuleAction =
            serde_json::from_str(r#"{"action": "disable", "rule_id": "42"}"#).unwrap();
        assert_eq!(
            action,
            MuteRuleAction::Disable {
                rule_id: Some(MuteRuleId::new("42"))
            }
        );

        let action: MuteRuleAction = serde_json::from_str(r#"{"action": "cycle"}"#).unwrap();
        assert_eq!(action, MuteRuleAction::Cycle);
    }

    #[test]
    fn deployment_without_rule_fields_deserializes() {
        let deployment: Deployment =
            serde_json::from_str(r#"{"id": "d1", "customer_name": "Acme"}"#).unwrap();
        assert_eq!(deployment, Deployment::new("d1", "Acme"));
    }
}
