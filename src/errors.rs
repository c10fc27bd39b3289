use thiserror::Error;

use crate::arn::ArnError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An error occurred deserializing policy definition {0}.")]
    Deserializing(#[source] serde_json::Error),

    #[error("Invalid policy format: '{0}' element is missing")]
    MissingElement(&'static str),

    #[error("Invalid policy format: Unsupported policy element '{0}'")]
    UnsupportedPolicyElement(String),

    #[error("Invalid policy format: {0}")]
    InvalidFormat(&'static str),

    #[error("Incorrect policy version. Allowed: 2012-10-17, 2008-10-17")]
    InvalidVersion(String),

    #[error("Invalid statement {index} format: {kind}")]
    InvalidStatement { index: usize, kind: StatementError },

    #[error("Invalid Service In Action: The service {0} specified in the action does not exist")]
    InvalidServiceInAction(String),

    #[error("Invalid Action: The action {0} does not exist.")]
    InvalidAction(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Reason a single statement was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("statement must be an object")]
    NotAnObject,

    #[error("Unsupported statement element '{0}'")]
    UnsupportedElement(String),

    #[error("{} and {} are mutually exclusive", .0.positive(), .0.negative())]
    MutuallyExclusive(ElementPair),

    #[error("{} or {} element is required", .0.positive(), .0.negative())]
    PairRequired(ElementPair),

    #[error("{0} element is required")]
    ElementRequired(&'static str),

    #[error("{} and {} elements are not allowed", .0.positive(), .0.negative())]
    PairNotAllowed(ElementPair),

    #[error("incorrect {0} definition")]
    IncorrectDefinition(&'static str),

    #[error("incorrect Effect definition '{0}'")]
    InvalidEffect(String),

    #[error("incorrect Resource definition. {0}")]
    InvalidResourceArn(#[source] ArnError),
}

/// A pair of statement elements where at most one member may be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPair {
    Action,
    Resource,
    Principal,
}

impl ElementPair {
    pub fn positive(self) -> &'static str {
        match self {
            ElementPair::Action => "Action",
            ElementPair::Resource => "Resource",
            ElementPair::Principal => "Principal",
        }
    }

    pub fn negative(self) -> &'static str {
        match self {
            ElementPair::Action => "NotAction",
            ElementPair::Resource => "NotResource",
            ElementPair::Principal => "NotPrincipal",
        }
    }
}
