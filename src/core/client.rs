use crate::core::mutation::{self, CREATE_FIELD, DELETE_FIELD, UPDATE_FIELD};
use crate::core::{Credentials, MuteRule, MuteRuleId};
use crate::utils::error::{MuteError, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.newrelic.com/graphql";
/// NerdGraph reads `API-Key`; header names go on the wire lowercased.
pub const API_KEY_HEADER: &str = "api-key";

/// Thin NerdGraph client for the muting rule mutations.
#[derive(Debug, Clone)]
pub struct NewRelicClient {
    client: Client,
    endpoint: String,
    account_id: String,
}

impl NewRelicClient {
    pub fn new(
        endpoint: impl Into<String>,
        credentials: &Credentials,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut api_key =
            HeaderValue::from_str(&credentials.api_key).map_err(|_| MuteError::SecretError {
                message: "API key contains characters not allowed in a header".to_string(),
            })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            account_id: credentials.account_id.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// POST a GraphQL document and return the `data` object of a 2xx reply.
    pub async fn execute(&self, query: &str) -> Result<Value> {
        tracing::debug!(endpoint = %self.endpoint, "Sending GraphQL mutation");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&mutation::request_body(query, &self.account_id))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "GraphQL response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "GraphQL request rejected");
            return Err(MuteError::QueryFailed {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let mut payload: Value = serde_json::from_slice(&bytes)?;

        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| e.to_string())
                    })
                    .collect();
                return Err(MuteError::GraphQlError { messages });
            }
        }

        match payload.get_mut("data") {
            Some(data) if data.is_object() => Ok(data.take()),
            _ => Err(MuteError::ResponseShapeError {
                path: "data".to_string(),
            }),
        }
    }

    /// Create the customer's mute rule. New Relic enables it on creation.
    pub async fn create_mute_rule(&self, customer_name: &str) -> Result<MuteRule> {
        let query = mutation::create_mute_rule_mutation(&self.account_id, customer_name)?;
        let data = self.execute(&query).await?;
        let id = extract_id(&data, CREATE_FIELD)?;

        Ok(MuteRule {
            id,
            name: Some(mutation::mute_rule_name(customer_name)),
            enabled: true,
        })
    }

    pub async fn toggle_mute_rule(&self, rule_id: &MuteRuleId, enabled: bool) -> Result<MuteRule> {
        let query = mutation::toggle_mute_rule_mutation(&self.account_id, rule_id, enabled)?;
        let data = self.execute(&query).await?;
        let id = extract_id(&data, UPDATE_FIELD)?;
        let rule = &data[UPDATE_FIELD];

        Ok(MuteRule {
            id,
            name: rule.get("name").and_then(Value::as_str).map(str::to_string),
            enabled: rule
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(enabled),
        })
    }

    pub async fn delete_mute_rule(&self, rule_id: &MuteRuleId) -> Result<MuteRuleId> {
        let query = mutation::delete_mute_rule_mutation(&self.account_id, rule_id)?;
        let data = self.execute(&query).await?;
        extract_id(&data, DELETE_FIELD)
    }
}

/// Pull `data.<field>.id`, accepting either a string or a numeric id.
fn extract_id(data: &Value, field: &str) -> Result<MuteRuleId> {
    match data.get(field).and_then(|rule| rule.get("id")) {
        Some(Value::String(id)) if !id.is_empty() => Ok(MuteRuleId::new(id.as_str())),
        Some(Value::Number(id)) => Ok(MuteRuleId::new(id.to_string())),
        _ => Err(MuteError::ResponseShapeError {
            path: format!("data.{}.id", field),
        }),
    }
}
