//! Validation and matching primitives for IAM-style policy documents.
//!
//! ```
//! use iam_policy_engine::{Decision, PolicyBuilder, PolicyType, Request, Result};
//!
//! fn main() -> Result<()> {
//!     let policy = PolicyBuilder::from_json(r#"{
//!         "Version": "2012-10-17",
//!         "Statement": [{ "Effect": "Allow", "Action": "s3:Get*", "Resource": "arn:aws:s3:::photos/*" }]
//!     }"#)
//!     .with_policy_type(PolicyType::Identity)
//!     .build()?;
//!
//!     let request = Request::new("s3:GetObject", "arn:aws:s3:::photos/cat.jpg")?;
//!     assert_eq!(Decision::Allowed, policy.evaluate(&request)?);
//!     Ok(())
//! }
//! ```
#![deny(rust_2018_idioms, warnings)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::similar_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::match_same_arms,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::return_self_not_must_use
)]
pub mod arn;
mod catalog;
mod errors;
pub mod matcher;
mod policy;
pub mod validator;

pub use arn::{Arn, ArnError};
pub use catalog::ActionCatalog;
pub use errors::{ElementPair, Error, Result, StatementError};
pub use matcher::{wildcard_match, DefaultResourceMatcher, Patterns, ResourceMatcher};
pub use policy::{
    Clause, Decision, Effect, PolicyBuilder, PolicyDocument, PolicyEngine, PolicyType, Principal,
    Request, Statement, ValueList, Version,
};
pub use validator::validate;
