//! Amazon Resource Name parsing.

use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Partitions accepted in a policy ARN. `*` is allowed in policies only.
pub const PARTITIONS: [&str; 4] = ["*", "aws", "aws-cn", "aws-us-gov"];

lazy_static! {
    // the resource part keeps any further colons and slashes.
    static ref ARN_GRAMMAR: Regex = Regex::new(
        r"(?s)^arn:(?P<partition>[^:]*):(?P<service>[^:]*):(?P<region>[^:]*):(?P<account>[^:]*):(?P<resource>.*)$"
    )
    .expect("ARN grammar is a valid regex");
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArnError {
    #[error("Invalid ARN: \"{0}\"")]
    Malformed(String),

    #[error("Invalid ARN partition \"{0}\". Supported values *, aws, aws-cn, aws-us-gov.")]
    Partition(String),

    #[error("Invalid ARN service: \"{0}\"")]
    Service(String),

    #[error("Empty ARN resource part")]
    EmptyResource,
}

/// `arn:partition:service:region:account-id:resource`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    partition: String,
    service: String,
    region: String,
    account_id: String,
    resource: String,
}

impl Arn {
    pub fn parse(candidate: &str) -> Result<Self, ArnError> {
        let captures = ARN_GRAMMAR
            .captures(candidate)
            .ok_or_else(|| ArnError::Malformed(candidate.to_string()))?;
        let field = |name| captures.name(name).map_or("", |m| m.as_str());

        let partition = field("partition");
        if !PARTITIONS.contains(&partition) {
            return Err(ArnError::Partition(partition.to_string()));
        }

        let service = field("service");
        if service.is_empty() {
            return Err(ArnError::Service(service.to_string()));
        }

        let resource = field("resource");
        if resource.is_empty() {
            return Err(ArnError::EmptyResource);
        }

        Ok(Self {
            partition: partition.to_string(),
            service: service.to_string(),
            region: field("region").to_string(),
            account_id: field("account").to_string(),
            resource: resource.to_string(),
        })
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Everything after the fifth colon, e.g. `user/Bob` or `bucket/key`.
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arn::parse(s)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    #[test]
    fn parse_s3_object() {
        let arn = Arn::parse("arn:aws:s3:::amzn-s3-demo-bucket/photos/cat.jpg").unwrap();

        assert_eq!("aws", arn.partition());
        assert_eq!("s3", arn.service());
        assert_eq!("", arn.region());
        assert_eq!("", arn.account_id());
        assert_eq!("amzn-s3-demo-bucket/photos/cat.jpg", arn.resource());
    }

    #[test]
    fn resource_part_keeps_colons() {
        let arn: Arn = "arn:aws:cloudtrail:us-east-2:444455556666:user/111122223333:trail/finance"
            .parse()
            .unwrap();

        assert_eq!("us-east-2", arn.region());
        assert_eq!("444455556666", arn.account_id());
        assert_eq!("user/111122223333:trail/finance", arn.resource());
    }

    #[test]
    fn display_reconstructs_input() {
        let raw = "arn:aws-us-gov:iam::123456789012:role/Admin";
        assert_eq!(raw, Arn::parse(raw).unwrap().to_string());
    }

    #[test_case("arn:*:s3:::bucket"; "wildcard partition")]
    #[test_case("arn:aws-cn:s3:::bucket"; "china partition")]
    #[test_case("arn:aws:iam::*:role/*"; "wildcard account")]
    fn accepts(raw: &str) {
        assert_matches!(Arn::parse(raw), Ok(_));
    }

    #[test]
    fn rejects_missing_prefix() {
        assert_matches!(
            Arn::parse(":aws:s3:::amzn-s3-demo-bucket"),
            Err(ArnError::Malformed(ref raw)) if raw == ":aws:s3:::amzn-s3-demo-bucket"
        );
        assert_matches!(Arn::parse("ARN:aws:s3:::bucket"), Err(ArnError::Malformed(_)));
    }

    #[test]
    fn rejects_too_few_fields() {
        assert_matches!(Arn::parse("arn:aws:s3:bucket"), Err(ArnError::Malformed(_)));
        assert_matches!(Arn::parse("*"), Err(ArnError::Malformed(_)));
    }

    #[test]
    fn rejects_unknown_partition() {
        let err = Arn::parse("arn::s3:::amzn-s3-demo-bucket").unwrap_err();
        assert_eq!(
            "Invalid ARN partition \"\". Supported values *, aws, aws-cn, aws-us-gov.",
            err.to_string()
        );
        assert_matches!(
            Arn::parse("arn:AWS:s3:::bucket"),
            Err(ArnError::Partition(ref p)) if p == "AWS"
        );
    }

    #[test]
    fn rejects_empty_service() {
        let err = Arn::parse("arn:aws::::amzn-s3-demo-bucket").unwrap_err();
        assert_eq!("Invalid ARN service: \"\"", err.to_string());
    }

    #[test]
    fn rejects_empty_resource() {
        assert_matches!(Arn::parse("arn:aws:s3:::"), Err(ArnError::EmptyResource));
    }
}
