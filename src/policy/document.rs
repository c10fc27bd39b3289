use std::{collections::BTreeMap, fmt, slice};

use serde::{
    ser::{SerializeMap, Serializer},
    Deserialize, Serialize,
};
use serde_json::Value;

use crate::errors::ElementPair;

/// Policy language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Version {
    #[serde(rename = "2008-10-17")]
    V2008_10_17,
    #[serde(rename = "2012-10-17")]
    V2012_10_17,
}

impl Version {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "2008-10-17" => Some(Version::V2008_10_17),
            "2012-10-17" => Some(Version::V2012_10_17),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Version::V2008_10_17 => "2008-10-17",
            Version::V2012_10_17 => "2012-10-17",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Allow" => Some(Effect::Allow),
            "Deny" => Some(Effect::Deny),
            _ => None,
        }
    }
}

/// Role a policy plays, which decides the elements a statement must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    /// Attached to a user, group or role.
    #[default]
    Identity,
    /// Attached to a resource such as a bucket or queue.
    Resource,
    /// Role trust policy, controls who may assume the role.
    Trust,
}

/// A non-empty list of non-empty strings, written in JSON either as a single
/// string or as an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueList(Vec<String>);

impl ValueList {
    pub(crate) fn new(values: Vec<String>) -> Self {
        debug_assert!(!values.is_empty());
        ValueList(values)
    }

    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ValueList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.len() == 1 {
            self.0[0].serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

/// Who a statement applies to. Kept as written; principals are never resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// `"*"`
    Any,
    /// e.g. `{"AWS": "arn:aws:iam::111122223333:root"}` or `{"Service": "..."}`
    Mapped(BTreeMap<String, ValueList>),
}

impl Serialize for Principal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Principal::Any => serializer.serialize_str("*"),
            Principal::Mapped(principals) => principals.serialize(serializer),
        }
    }
}

/// One member of a mutually exclusive element pair, e.g. `Action` vs `NotAction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause<T> {
    Is(T),
    Not(T),
}

impl<T> Clause<T> {
    pub fn value(&self) -> &T {
        match self {
            Clause::Is(value) | Clause::Not(value) => value,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Clause::Not(_))
    }

    pub(crate) fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Clause<U>, E> {
        match self {
            Clause::Is(value) => f(value).map(Clause::Is),
            Clause::Not(value) => f(value).map(Clause::Not),
        }
    }

    fn key(&self, pair: ElementPair) -> &'static str {
        match self {
            Clause::Is(_) => pair.positive(),
            Clause::Not(_) => pair.negative(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) effect: Effect,
    pub(crate) action: Clause<ValueList>,
    pub(crate) resource: Option<Clause<ValueList>>,
    pub(crate) principal: Option<Clause<Principal>>,
    pub(crate) condition: Option<Value>,
}

impl Statement {
    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn action(&self) -> &Clause<ValueList> {
        &self.action
    }

    pub fn resource(&self) -> Option<&Clause<ValueList>> {
        self.resource.as_ref()
    }

    pub fn principal(&self) -> Option<&Clause<Principal>> {
        self.principal.as_ref()
    }

    pub fn condition(&self) -> Option<&Value> {
        self.condition.as_ref()
    }
}

impl Serialize for Statement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Effect", &self.effect)?;
        if let Some(principal) = &self.principal {
            map.serialize_entry(principal.key(ElementPair::Principal), principal.value())?;
        }
        map.serialize_entry(self.action.key(ElementPair::Action), self.action.value())?;
        if let Some(resource) = &self.resource {
            map.serialize_entry(resource.key(ElementPair::Resource), resource.value())?;
        }
        if let Some(condition) = &self.condition {
            map.serialize_entry("Condition", condition)?;
        }
        map.end()
    }
}

/// A validated policy document. Only [`crate::validator::validate`] creates
/// one, so every instance satisfies the grammar for its policy type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub(crate) version: Version,
    #[serde(rename = "Statement")]
    pub(crate) statements: Vec<Statement>,
}

impl PolicyDocument {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}
