use std::sync::Arc;

use serde_json::Value;

use crate::{
    matcher::{DefaultResourceMatcher, ResourceMatcher},
    policy::{Decision, PolicyEngine, PolicyType},
    validator, ActionCatalog, Error, Result,
};

enum Source {
    Json(String),
    Value(Value),
}

/// Configures and builds a [`PolicyEngine`].
///
/// Defaults: identity policy, built-in action catalog, glob resource
/// matching and `Decision::Denied` when no statement applies.
pub struct PolicyBuilder<M> {
    source: Source,
    policy_type: PolicyType,
    catalog: Option<Arc<ActionCatalog>>,
    matcher: M,
    default_decision: Decision,
}

impl PolicyBuilder<DefaultResourceMatcher> {
    pub fn from_json(json: &str) -> Self {
        Self::from_source(Source::Json(json.into()))
    }

    pub fn from_value(document: Value) -> Self {
        Self::from_source(Source::Value(document))
    }

    fn from_source(source: Source) -> Self {
        Self {
            source,
            policy_type: PolicyType::default(),
            catalog: None,
            matcher: DefaultResourceMatcher,
            default_decision: Decision::Denied,
        }
    }
}

impl<M> PolicyBuilder<M>
where
    M: ResourceMatcher,
{
    pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = policy_type;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<ActionCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_matcher<N>(self, matcher: N) -> PolicyBuilder<N>
    where
        N: ResourceMatcher,
    {
        PolicyBuilder {
            source: self.source,
            policy_type: self.policy_type,
            catalog: self.catalog,
            matcher,
            default_decision: self.default_decision,
        }
    }

    pub fn with_default_decision(mut self, decision: Decision) -> Self {
        self.default_decision = decision;
        self
    }

    pub fn build(self) -> Result<PolicyEngine<M>> {
        let document = match self.source {
            Source::Json(json) => serde_json::from_str(&json).map_err(Error::Deserializing)?,
            Source::Value(value) => value,
        };

        let document = validator::validate(&document, self.policy_type)?;
        tracing::debug!(
            policy_type = ?self.policy_type,
            statements = document.statements().len(),
            "built policy engine"
        );

        Ok(PolicyEngine {
            document,
            policy_type: self.policy_type,
            catalog: self.catalog.unwrap_or_else(ActionCatalog::builtin),
            resource_matcher: self.matcher,
            default_decision: self.default_decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matcher::Exact,
        policy::{tests::build_policy, Request},
        StatementError,
    };
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_basic_definition() {
        let policy = build_policy(
            r#"{
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Effect": "Allow",
                        "Action": ["sqs:SendMessage", "sqs:ReceiveMessage"],
                        "Resource": "arn:aws:sqs:us-east-1:123456789012:orders"
                    },
                    {
                        "Effect": "Deny",
                        "NotAction": "sqs:*",
                        "Resource": "*"
                    }
                ]
            }"#,
        );

        assert_eq!(PolicyType::Identity, policy.policy_type());
        assert_eq!(2, policy.document().statements().len());
        assert_eq!(2, policy.document().statements()[0].action().value().len());
        assert!(policy.catalog().has_service("sqs"));
    }

    #[test]
    fn invalid_json_is_a_deserializing_error() {
        assert_matches!(
            PolicyBuilder::from_json("{ \"Version\": ").build(),
            Err(Error::Deserializing(_))
        );
    }

    #[test]
    fn validation_errors_abort_build() {
        let result = PolicyBuilder::from_value(json!({
            "Version": "2012-10-17",
            "Statement": [{ "Effect": "Allow", "Action": "s3:GetObject" }]
        }))
        .with_policy_type(PolicyType::Resource)
        .build();

        assert_matches!(
            result,
            Err(Error::InvalidStatement {
                index: 0,
                kind: StatementError::PairRequired(_)
            })
        );
    }

    #[test]
    fn custom_matcher() {
        let policy = PolicyBuilder::from_json(
            r#"{
                "Version": "2012-10-17",
                "Statement": [{ "Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:aws:s3:::bucket/*" }]
            }"#,
        )
        .with_matcher(Exact)
        .build()
        .expect("Unable to build policy from json.");

        let request = Request::new("s3:GetObject", "arn:aws:s3:::bucket/key").unwrap();
        assert_matches!(policy.evaluate(&request), Ok(Decision::Denied));

        let request = Request::new("s3:GetObject", "arn:aws:s3:::bucket/*").unwrap();
        assert_matches!(policy.evaluate(&request), Ok(Decision::Allowed));
    }

    #[test]
    fn shared_catalog() {
        let catalog = Arc::new(ActionCatalog::from_json(r#"{ "s3": ["GetObject"] }"#).unwrap());
        let json = r#"{
            "Version": "2012-10-17",
            "Statement": [{ "Effect": "Allow", "Action": "s3:GetObject", "Resource": "*" }]
        }"#;

        let first = PolicyBuilder::from_json(json)
            .with_catalog(Arc::clone(&catalog))
            .build()
            .unwrap();
        let second = PolicyBuilder::from_json(json)
            .with_catalog(Arc::clone(&catalog))
            .build()
            .unwrap();

        assert_eq!(3, Arc::strong_count(&catalog));
        assert!(first.action_matches("s3:GetObject", ["s3:Get*"]).unwrap());
        assert_matches!(
            second.action_matches("s3:PutObject", ["s3:Put*"]),
            Err(Error::InvalidAction(_))
        );
    }
}
