//! GraphQL documents for the NerdGraph alerts muting rule mutations.
//!
//! Values are interpolated directly into the documents. Strings go through
//! [`graphql_string`]; the account id is checked to be numeric when the
//! credentials are parsed.

use crate::core::MuteRuleId;
use crate::utils::error::Result;
use serde_json::{json, Value};

pub const CREATE_FIELD: &str = "alertsMutingRuleCreate";
pub const UPDATE_FIELD: &str = "alertsMutingRuleUpdate";
pub const DELETE_FIELD: &str = "alertsMutingRuleDelete";

/// Render `value` as a quoted GraphQL string literal. JSON string escaping
/// is a subset of what GraphQL accepts.
pub fn graphql_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn mute_rule_name(customer_name: &str) -> String {
    format!("{} - Mute Rule", customer_name)
}

/// The rule mutes anything labelled with the customer or whose app name
/// contains it, and starts out enabled.
pub fn create_mute_rule_mutation(account_id: &str, customer_name: &str) -> Result<String> {
    let customer = graphql_string(customer_name)?;
    Ok(format!(
        r#"mutation {{
  {field}(accountId: {account_id}, rule: {{
    name: {name},
    description: {description},
    enabled: true,
    condition: {{
      operator: OR,
      conditions: [
        {{
          attribute: "tags.label.Customer",
          operator: EQUALS,
          values: [{customer}]
        }},
        {{
          attribute: "tags.appName",
          operator: CONTAINS,
          values: [{customer}]
        }}
      ]
    }}
  }}) {{
    id
  }}
}}"#,
        field = CREATE_FIELD,
        account_id = account_id,
        name = graphql_string(&mute_rule_name(customer_name))?,
        description = graphql_string(&format!("Mute Rule for customer {}", customer_name))?,
        customer = customer,
    ))
}

pub fn toggle_mute_rule_mutation(
    account_id: &str,
    rule_id: &MuteRuleId,
    enabled: bool,
) -> Result<String> {
    Ok(format!(
        r#"mutation {{
  {field}(accountId: {account_id}, id: {id}, rule: {{
    enabled: {enabled}
  }}) {{
    name
    enabled
    id
  }}
}}"#,
        field = UPDATE_FIELD,
        account_id = account_id,
        id = graphql_string(rule_id.as_str())?,
        enabled = enabled,
    ))
}

pub fn delete_mute_rule_mutation(account_id: &str, rule_id: &MuteRuleId) -> Result<String> {
    Ok(format!(
        r#"mutation {{
  {field}(accountId: {account_id}, id: {id}) {{
    id
  }}
}}"#,
        field = DELETE_FIELD,
        account_id = account_id,
        id = graphql_string(rule_id.as_str())?,
    ))
}

/// JSON body POSTed to the GraphQL endpoint.
pub fn request_body(query: &str, account_id: &str) -> Value {
    json!({
        "query": query,
        "variables": { "Account": account_id },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(graphql_string("Acme").unwrap(), r#""Acme""#);
        assert_eq!(graphql_string(r#"Ac"me\"#).unwrap(), r#""Ac\"me\\""#);
        assert_eq!(graphql_string("a\nb\u{1}").unwrap(), r#""a\nb\u0001""#);
        assert_eq!(graphql_string("Zürich").unwrap(), r#""Zürich""#);
    }

    #[test]
    fn create_mutation_embeds_account_and_customer() {
        let doc = create_mute_rule_mutation("1234567", "Acme").unwrap();
        assert!(doc.contains("alertsMutingRuleCreate(accountId: 1234567"));
        assert!(doc.contains(r#"name: "Acme - Mute Rule""#));
        assert!(doc.contains(r#"description: "Mute Rule for customer Acme""#));
        assert!(doc.contains("enabled: true"));
        assert!(doc.contains("operator: OR"));
        assert!(doc.contains(r#"attribute: "tags.label.Customer""#));
        assert!(doc.contains(r#"attribute: "tags.appName""#));
        assert!(doc.contains("operator: CONTAINS"));
        assert_eq!(doc.matches(r#"values: ["Acme"]"#).count(), 2);
    }

    #[test]
    fn create_mutation_cannot_be_broken_out_of() {
        let doc = create_mute_rule_mutation("1", r#"x"] }) { id } evil"#).unwrap();
        assert!(doc.contains(r#"values: ["x\"] }) { id } evil"]"#));
    }

    #[test]
    fn toggle_mutation_passes_flag_through() {
        let id = MuteRuleId::new("987");
        let disabled = toggle_mute_rule_mutation("1234567", &id, false).unwrap();
        assert!(disabled.contains(r#"alertsMutingRuleUpdate(accountId: 1234567, id: "987""#));
        assert!(disabled.contains("enabled: false"));

        let enabled = toggle_mute_rule_mutation("1234567", &id, true).unwrap();
        assert!(enabled.contains("enabled: true"));
    }

    #[test]
    fn delete_mutation_targets_rule() {
        let doc = delete_mute_rule_mutation("1", &MuteRuleId::new("55")).unwrap();
        assert!(doc.contains(r#"alertsMutingRuleDelete(accountId: 1, id: "55")"#));
    }

    #[test]
    fn request_body_carries_account_variable() {
        let body = request_body("mutation { x }", "42");
        assert_eq!(body["query"], "mutation { x }");
        assert_eq!(body["variables"]["Account"], "42");
    }
}
