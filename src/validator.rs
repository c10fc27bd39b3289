//! Structural validation of raw policy documents.
//!
//! Checks run in a fixed order and stop at the first failure, so the error
//! returned for a document with several problems is deterministic:
//! top-level elements, version, then each statement in index order
//! (unknown keys, Action pair, Resource pair, Principal pair, element
//! values, Effect, resource names).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{
    arn::Arn,
    errors::{ElementPair, StatementError},
    policy::{Clause, Effect, PolicyDocument, PolicyType, Principal, Statement, ValueList, Version},
    Error, Result,
};

const TOP_LEVEL_ELEMENTS: [&str; 2] = ["Version", "Statement"];

const PRINCIPAL_KINDS: [&str; 4] = ["AWS", "Service", "Federated", "CanonicalUser"];

/// Keys a statement may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementField {
    Effect,
    Action,
    NotAction,
    Resource,
    NotResource,
    Principal,
    NotPrincipal,
    Condition,
}

impl StatementField {
    const ALL: [StatementField; 8] = [
        StatementField::Effect,
        StatementField::Action,
        StatementField::NotAction,
        StatementField::Resource,
        StatementField::NotResource,
        StatementField::Principal,
        StatementField::NotPrincipal,
        StatementField::Condition,
    ];

    fn key(self) -> &'static str {
        match self {
            StatementField::Effect => "Effect",
            StatementField::Action => "Action",
            StatementField::NotAction => "NotAction",
            StatementField::Resource => "Resource",
            StatementField::NotResource => "NotResource",
            StatementField::Principal => "Principal",
            StatementField::NotPrincipal => "NotPrincipal",
            StatementField::Condition => "Condition",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }
}

/// Presence rule for a mutually exclusive element pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Requirement {
    /// One member must be present; a missing pair is reported by both names.
    Either,
    /// One member must be present; a missing pair is reported by the
    /// positive name only.
    Positive,
    Forbidden,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElementRules {
    pub(crate) action: Requirement,
    pub(crate) resource: Requirement,
    pub(crate) principal: Requirement,
}

impl ElementRules {
    pub(crate) fn for_type(policy_type: PolicyType) -> Self {
        let (resource, principal) = match policy_type {
            PolicyType::Identity => (Requirement::Either, Requirement::Forbidden),
            PolicyType::Resource => (Requirement::Optional, Requirement::Either),
            PolicyType::Trust => (Requirement::Forbidden, Requirement::Positive),
        };
        ElementRules {
            action: Requirement::Either,
            resource,
            principal,
        }
    }
}

/// Validates `document` against the policy grammar for `policy_type`.
pub fn validate(document: &Value, policy_type: PolicyType) -> Result<PolicyDocument> {
    validate_document(document, ElementRules::for_type(policy_type)).map_err(|e| {
        tracing::debug!(?policy_type, error = %e, "rejected policy document");
        e
    })
}

fn validate_document(document: &Value, rules: ElementRules) -> Result<PolicyDocument> {
    let fields = document
        .as_object()
        .ok_or(Error::InvalidFormat("policy must be an object"))?;

    let version = fields
        .get("Version")
        .ok_or(Error::MissingElement("Version"))?;
    let statement = fields
        .get("Statement")
        .ok_or(Error::MissingElement("Statement"))?;

    if let Some(key) = fields
        .keys()
        .find(|key| !TOP_LEVEL_ELEMENTS.contains(&key.as_str()))
    {
        return Err(Error::UnsupportedPolicyElement(key.clone()));
    }

    let version = match version {
        Value::String(raw) => Version::parse(raw).ok_or_else(|| Error::InvalidVersion(raw.clone())),
        other => Err(Error::InvalidVersion(other.to_string())),
    }?;

    // a single statement may be written without the surrounding array.
    let raw_statements: Vec<&Value> = match statement {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![statement],
        _ => {
            return Err(Error::InvalidFormat(
                "'Statement' element must be an object or an array",
            ))
        }
    };

    let statements = raw_statements
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            validate_statement(raw, rules).map_err(|kind| Error::InvalidStatement { index, kind })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PolicyDocument {
        version,
        statements,
    })
}

fn validate_statement(
    statement: &Value,
    rules: ElementRules,
) -> std::result::Result<Statement, StatementError> {
    let fields = statement.as_object().ok_or(StatementError::NotAnObject)?;

    if let Some(key) = fields
        .keys()
        .find(|key| StatementField::from_key(key).is_none())
    {
        return Err(StatementError::UnsupportedElement(key.clone()));
    }

    let action = element_pair(fields, ElementPair::Action, rules.action)?;
    let resource = element_pair(fields, ElementPair::Resource, rules.resource)?;
    let principal = element_pair(fields, ElementPair::Principal, rules.principal)?;

    let action = action
        .ok_or(StatementError::PairRequired(ElementPair::Action))?
        .try_map(|value| value_list(value, "Action"))?;
    let resource = resource
        .map(|clause| clause.try_map(|value| value_list(value, "Resource")))
        .transpose()?;
    let principal = principal
        .map(|clause| clause.try_map(principal_spec))
        .transpose()?;

    let condition = match fields.get(StatementField::Condition.key()) {
        None => None,
        Some(condition @ Value::Object(_)) => Some(condition.clone()),
        Some(_) => return Err(StatementError::IncorrectDefinition("Condition")),
    };

    let effect = match fields.get(StatementField::Effect.key()) {
        None => return Err(StatementError::ElementRequired("Effect")),
        Some(Value::String(raw)) => {
            Effect::parse(raw).ok_or_else(|| StatementError::InvalidEffect(raw.clone()))?
        }
        Some(other) => return Err(StatementError::InvalidEffect(other.to_string())),
    };

    if let Some(resource) = &resource {
        for element in resource.value().iter().filter(|element| *element != "*") {
            Arn::parse(element).map_err(StatementError::InvalidResourceArn)?;
        }
    }

    Ok(Statement {
        effect,
        action,
        resource,
        principal,
        condition,
    })
}

/// Picks the present member of a mutually exclusive pair and applies the
/// presence rule to it.
fn element_pair(
    fields: &Map<String, Value>,
    pair: ElementPair,
    requirement: Requirement,
) -> std::result::Result<Option<Clause<&Value>>, StatementError> {
    let clause = match (fields.get(pair.positive()), fields.get(pair.negative())) {
        (Some(_), Some(_)) => return Err(StatementError::MutuallyExclusive(pair)),
        (Some(value), None) => Some(Clause::Is(value)),
        (None, Some(value)) => Some(Clause::Not(value)),
        (None, None) => None,
    };

    match (requirement, &clause) {
        (Requirement::Forbidden, Some(_)) => Err(StatementError::PairNotAllowed(pair)),
        (Requirement::Either, None) => Err(StatementError::PairRequired(pair)),
        (Requirement::Positive, None) => Err(StatementError::ElementRequired(pair.positive())),
        _ => Ok(clause),
    }
}

fn value_list(
    value: &Value,
    element: &'static str,
) -> std::result::Result<ValueList, StatementError> {
    let incorrect = || StatementError::IncorrectDefinition(element);

    let values = match value {
        Value::String(single) => vec![single.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(incorrect))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        _ => return Err(incorrect()),
    };

    if values.is_empty() || values.iter().any(String::is_empty) {
        return Err(incorrect());
    }
    Ok(ValueList::new(values))
}

fn principal_spec(value: &Value) -> std::result::Result<Principal, StatementError> {
    match value {
        Value::String(any) if any == "*" => Ok(Principal::Any),
        Value::Object(kinds) if !kinds.is_empty() => kinds
            .iter()
            .map(|(kind, ids)| {
                if PRINCIPAL_KINDS.contains(&kind.as_str()) {
                    Ok((kind.clone(), value_list(ids, "Principal")?))
                } else {
                    Err(StatementError::IncorrectDefinition("Principal"))
                }
            })
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()
            .map(Principal::Mapped),
        _ => Err(StatementError::IncorrectDefinition("Principal")),
    }
}
