use crate::core::{Credentials, SecretSource};
use crate::utils::error::{MuteError, Result};
use serde_json::Value;

pub const DEFAULT_SECRET_ID: &str = "newrelic_secrets";
pub const DEFAULT_SECRET_REGION: &str = "us-east-1";

const ACCOUNT_FIELD: &str = "ACCOUNT";
const API_KEY_FIELD: &str = "API_KEY";

/// Fetch the New Relic account id and API key from `source`.
pub async fn newrelic_session<S>(source: &S, secret_id: &str) -> Result<Credentials>
where
    S: SecretSource + ?Sized,
{
    tracing::debug!(secret_id, "Fetching New Relic credentials");

    let result = match source.fetch_secret(secret_id).await {
        Ok(raw) => parse_credentials(&raw),
        Err(e) => Err(e),
    };

    match result {
        Ok(credentials) => {
            tracing::info!(
                secret_id,
                account_id = %credentials.account_id,
                "Loaded New Relic credentials"
            );
            Ok(credentials)
        }
        Err(e) => {
            tracing::error!(secret_id, error = %e, "Failed to load New Relic credentials");
            Err(e)
        }
    }
}

/// Parse a `{"ACCOUNT": ..., "API_KEY": ...}` secret payload.
pub fn parse_credentials(raw: &str) -> Result<Credentials> {
    let payload: Value = serde_json::from_str(raw).map_err(|e| MuteError::SecretError {
        message: format!("secret payload is not valid JSON: {}", e),
    })?;

    let object = payload.as_object().ok_or_else(|| MuteError::SecretError {
        message: "secret payload is not a JSON object".to_string(),
    })?;

    // Account ids are sometimes stored as bare numbers.
    let account_id = match object.get(ACCOUNT_FIELD) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) if n.is_u64() => n.to_string(),
        Some(_) => {
            return Err(MuteError::SecretError {
                message: format!("{} must be a string", ACCOUNT_FIELD),
            })
        }
        None => {
            return Err(MuteError::SecretError {
                message: format!("secret payload has no {} field", ACCOUNT_FIELD),
            })
        }
    };

    if account_id.is_empty() || !account_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(MuteError::SecretError {
            message: format!("{} must be a numeric account id", ACCOUNT_FIELD),
        });
    }

    let api_key = object
        .get(API_KEY_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| MuteError::SecretError {
            message: format!("secret payload has no usable {} field", API_KEY_FIELD),
        })?
        .to_string();

    Ok(Credentials {
        account_id,
        api_key,
    })
}
