//! Access policies and their rules.

use crate::client::FtdClient;
use crate::models::{AccessPolicy, AccessRule};
use crate::{crud, duplicate, Result};
use ftd_core::query::ListQuery;
use ftd_core::types::{access_rules_endpoint, ACCESS_POLICIES_ENDPOINT, TYPE_ACCESS_RULE};
use ftd_core::{CreateOutcome, DuplicatePolicy, Error};

fn rules_endpoint(policy_id: &str) -> Result<String> {
    if policy_id.is_empty() {
        return Err(Error::ConfigError(
            "access policy id is required for access rules".to_string(),
        ));
    }
    Ok(access_rules_endpoint(policy_id))
}

impl FtdClient {
    /// List access policies.
    pub async fn list_access_policies(&self) -> Result<Vec<AccessPolicy>> {
        crud::list(self, ACCESS_POLICIES_ENDPOINT, &ListQuery::default()).await
    }

    /// Fetch an access policy by id.
    pub async fn get_access_policy(&self, id: &str) -> Result<AccessPolicy> {
        crud::get(self, ACCESS_POLICIES_ENDPOINT, id).await
    }

    /// PUT an access policy and adopt the result.
    ///
    /// The policy and default-action type tags are set before sending.
    pub async fn update_access_policy(&self, policy: &mut AccessPolicy) -> Result<()> {
        let mut staged = policy.clone();
        staged.normalize_type_tags();
        crud::update(self, ACCESS_POLICIES_ENDPOINT, &mut staged).await?;
        *policy = staged;
        Ok(())
    }

    /// List the rules of an access policy.
    pub async fn list_access_rules(&self, policy_id: &str, limit: u32) -> Result<Vec<AccessRule>> {
        crud::list(self, &rules_endpoint(policy_id)?, &ListQuery::with_limit(limit)).await
    }

    /// Fetch an access rule by id.
    pub async fn get_access_rule(&self, policy_id: &str, id: &str) -> Result<AccessRule> {
        crud::get(self, &rules_endpoint(policy_id)?, id).await
    }

    /// Access rules of a policy whose name matches `name`.
    pub async fn find_access_rules(&self, policy_id: &str, name: &str) -> Result<Vec<AccessRule>> {
        crud::list(self, &rules_endpoint(policy_id)?, &ListQuery::by_name(name)).await
    }

    /// Create an access rule in a policy, resolving a name conflict per `policy`.
    pub async fn create_access_rule(
        &self,
        policy_id: &str,
        rule: &mut AccessRule,
        policy: DuplicatePolicy,
    ) -> Result<CreateOutcome> {
        let endpoint = rules_endpoint(policy_id)?;
        rule.meta.type_tag = TYPE_ACCESS_RULE.to_string();
        duplicate::create_with_policy(self, &endpoint, rule, policy).await
    }

    /// PUT an access rule and adopt the result.
    pub async fn update_access_rule(&self, policy_id: &str, rule: &mut AccessRule) -> Result<()> {
        crud::update(self, &rules_endpoint(policy_id)?, rule).await
    }

    /// Delete an access rule.
    pub async fn delete_access_rule(&self, policy_id: &str, rule: &AccessRule) -> Result<()> {
        crud::delete(self, &rules_endpoint(policy_id)?, &rule.meta.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleAction;
    use ftd_core::config::{FtdClientConfig, Scheme};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn connected(server: &MockServer) -> FtdClient {
        Mock::given(method("POST"))
            .and(path("/api/fdm/v1/fdm/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "refresh_token": "ref-1",
                "expires_in": 1800
            })))
            .mount(server)
            .await;

        let config = FtdClientConfig::new(server.address().to_string())
            .unwrap()
            .with_scheme(Scheme::Http)
            .with_password_grant("admin", "Admin123");
        FtdClient::connect(config).await.unwrap()
    }

    #[tokio::test]
    async fn update_policy_sets_type_tags() {
        let server = MockServer::start().await;
        let client = connected(&server).await;

        Mock::given(method("PUT"))
            .and(path("/api/fdm/v1/policy/accesspolicies/pol-1"))
            .and(body_partial_json(json!({
                "type": "accesspolicy",
                "defaultAction": {"type": "accessdefaultaction", "action": "DENY"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pol-1", "version": "p2", "name": "NGFW-Access-Policy", "type": "accesspolicy",
                "defaultAction": {"action": "DENY", "eventLogAction": "LOG_NONE", "type": "accessdefaultaction"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut policy: AccessPolicy = serde_json::from_value(json!({
            "id": "pol-1", "version": "p1", "name": "NGFW-Access-Policy",
            "defaultAction": {"action": "DENY"}
        }))
        .unwrap();

        client.update_access_policy(&mut policy).await.unwrap();
        assert_eq!(policy.meta.version, "p2");
    }

    #[tokio::test]
    async fn rule_create_is_policy_scoped() {
        let server = MockServer::start().await;
        let client = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/fdm/v1/policy/accesspolicies/pol-1/accessrules"))
            .and(body_partial_json(json!({"type": "accessrule", "ruleAction": "PERMIT"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "r-1", "version": "v1", "name": "allow-web", "type": "accessrule",
                "ruleId": 268_435_457, "ruleAction": "PERMIT"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut rule = AccessRule::new("allow-web", RuleAction::Permit);
        client
            .create_access_rule("pol-1", &mut rule, DuplicatePolicy::Error)
            .await
            .unwrap();

        assert_eq!(rule.meta.id, "r-1");
        assert_eq!(rule.rule_id, Some(268_435_457));
    }

    #[tokio::test]
    async fn list_rules_sends_limit() {
        let server = MockServer::start().await;
        let client = connected(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/fdm/v1/policy/accesspolicies/pol-1/accessrules"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.list_access_rules("pol-1", 25).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_policy_id_sends_nothing() {
        let server = MockServer::start().await;
        let client = connected(&server).await;

        let mut rule = AccessRule::new("r", RuleAction::Deny);
        assert!(matches!(
            client
                .create_access_rule("", &mut rule, DuplicatePolicy::Error)
                .await,
            Err(Error::ConfigError(_))
        ));
    }
}
