mod builder;
mod document;

pub use builder::PolicyBuilder;
pub use document::{
    Clause, Effect, PolicyDocument, PolicyType, Principal, Statement, ValueList, Version,
};

use std::sync::Arc;

use serde_json::Value;

use crate::errors::Result;
use crate::matcher::{wildcard_match, DefaultResourceMatcher, Patterns, ResourceMatcher};
use crate::{ActionCatalog, Error};

/// Policy engine. Holds a validated, read-only policy document together with
/// the action catalog used to verify action patterns.
///
/// An engine only exists for a document that passed validation for its
/// policy type; every method is a pure query over that state, so a single
/// engine can be shared between threads.
#[derive(Debug)]
pub struct PolicyEngine<M = DefaultResourceMatcher> {
    document: PolicyDocument,
    policy_type: PolicyType,
    catalog: Arc<ActionCatalog>,
    resource_matcher: M,
    default_decision: Decision,
}

impl PolicyEngine {
    /// Validates `document` as a `policy_type` policy and builds an engine
    /// backed by the built-in action catalog.
    pub fn new(document: &Value, policy_type: PolicyType) -> Result<Self> {
        PolicyBuilder::from_value(document.clone())
            .with_policy_type(policy_type)
            .build()
    }
}

impl<M> PolicyEngine<M>
where
    M: ResourceMatcher,
{
    pub fn document(&self) -> &PolicyDocument {
        &self.document
    }

    pub fn policy_type(&self) -> PolicyType {
        self.policy_type
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Glob match, see [`wildcard_match`].
    #[allow(clippy::unused_self)]
    pub fn wildcard_match(&self, pattern: &str, candidate: &str) -> bool {
        wildcard_match(pattern, candidate)
    }

    /// Checks whether `action` (e.g. `s3:GetObject`) is matched by any of the
    /// action `patterns`, given as one pattern or a list of them.
    ///
    /// Every pattern is verified against the catalog before any matching
    /// happens, so one unknown service or action fails the whole call even
    /// when another pattern would match.
    pub fn action_matches<'p, P>(&self, action: &str, patterns: P) -> Result<bool>
    where
        P: Patterns<'p>,
    {
        let parsed = patterns
            .patterns()
            .into_iter()
            .map(|pattern| self.parse_action_pattern(pattern))
            .collect::<Result<Vec<_>>>()?;

        let (service, name) = action.split_once(':').unwrap_or((action, ""));
        Ok(parsed.iter().any(|pattern| pattern.matches(service, name)))
    }

    /// Checks whether `resource` is matched by any of the resource `patterns`,
    /// given as one pattern or a list of them.
    ///
    /// Resource patterns are never checked against a registry. Empty patterns
    /// and empty resources never match.
    pub fn resource_matches<'p, P>(&self, resource: &str, patterns: P) -> bool
    where
        P: Patterns<'p>,
    {
        if resource.is_empty() {
            return false;
        }
        patterns
            .patterns()
            .into_iter()
            .any(|pattern| !pattern.is_empty() && self.resource_matcher.do_match(resource, pattern))
    }

    /// Evaluates the provided `&Request` and produces the `Decision`.
    ///
    /// An applicable `Deny` statement always wins. If no statement applies,
    /// the default `Decision` is returned.
    pub fn evaluate(&self, request: &Request) -> Result<Decision> {
        let decision = match self.eval_statements(request)? {
            // explicit allow or deny.
            Some(effect) => effect.into(),
            // no statement applies.
            None => self.default_decision,
        };
        tracing::trace!(
            action = %request.action,
            resource = %request.resource,
            ?decision,
            "evaluated request"
        );
        Ok(decision)
    }

    fn eval_statements(&self, request: &Request) -> Result<Option<Effect>> {
        let mut allowed = false;
        for statement in self.document.statements() {
            if !self.applies(statement, request)? {
                continue;
            }
            match statement.effect() {
                Effect::Deny => return Ok(Some(Effect::Deny)),
                Effect::Allow => allowed = true,
            }
        }
        Ok(if allowed { Some(Effect::Allow) } else { None })
    }

    fn applies(&self, statement: &Statement, request: &Request) -> Result<bool> {
        let action_applies = match statement.action() {
            Clause::Is(patterns) => self.action_matches(&request.action, patterns)?,
            Clause::Not(patterns) => !self.action_matches(&request.action, patterns)?,
        };
        if !action_applies {
            return Ok(false);
        }

        let resource_applies = match statement.resource() {
            Some(Clause::Is(patterns)) => self.resource_matches(&request.resource, patterns),
            Some(Clause::Not(patterns)) => !self.resource_matches(&request.resource, patterns),
            None => true,
        };
        if !resource_applies {
            return Ok(false);
        }

        // conditions are never evaluated: a conditional deny is assumed to
        // hold and a conditional allow is assumed not to.
        Ok(statement.condition().is_none() || statement.effect() == Effect::Deny)
    }

    fn parse_action_pattern<'a>(&self, pattern: &'a str) -> Result<ActionPattern<'a>> {
        self.verify_action_pattern(pattern).map_err(|e| {
            tracing::debug!(pattern, error = %e, "rejected action pattern");
            e
        })
    }

    fn verify_action_pattern<'a>(&self, pattern: &'a str) -> Result<ActionPattern<'a>> {
        if pattern == "*" {
            return Ok(ActionPattern::Any);
        }

        let (service, name) = pattern
            .split_once(':')
            .ok_or_else(|| Error::InvalidAction(pattern.to_string()))?;

        // the service prefix is always literal.
        if service.contains(|c: char| c == '*' || c == '?') {
            return Err(Error::InvalidServiceInAction(service.to_string()));
        }
        if name.is_empty() {
            return Err(Error::InvalidAction(pattern.to_string()));
        }

        let known = self
            .catalog
            .actions_for(service)
            .ok_or_else(|| Error::InvalidServiceInAction(service.to_string()))?;
        if !known.iter().any(|action| wildcard_match(name, action)) {
            return Err(Error::InvalidAction(pattern.to_string()));
        }

        Ok(ActionPattern::Scoped { service, name })
    }
}

/// An action pattern that passed catalog verification.
#[derive(Debug, Clone, Copy)]
enum ActionPattern<'a> {
    Any,
    Scoped { service: &'a str, name: &'a str },
}

impl ActionPattern<'_> {
    fn matches(&self, service: &str, name: &str) -> bool {
        match self {
            ActionPattern::Any => true,
            ActionPattern::Scoped {
                service: pattern_service,
                name: pattern_name,
            } => *pattern_service == service && wildcard_match(pattern_name, name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    action: String,
    resource: String,
}

impl Request {
    /// `action` is a `service:ActionName` string, `resource` an ARN. The
    /// resource may be empty for policies without resource elements.
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Result<Self> {
        let action = action.into();
        if action.is_empty() {
            return Err(Error::BadRequest("Action must be specified".into()));
        }

        Ok(Self {
            action,
            resource: resource.into(),
        })
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

impl From<Effect> for Decision {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Allow => Decision::Allowed,
            Effect::Deny => Decision::Denied,
        }
    }
}
