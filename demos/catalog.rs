use std::sync::Arc;

use iam_policy_engine::{ActionCatalog, PolicyEngine, PolicyBuilder, PolicyType, Result};

fn main() -> Result<()> {
    // a catalog for a custom service, shared by every engine built below.
    let catalog = Arc::new(ActionCatalog::from_json(
        r#"{ "mqtt": ["Connect", "Publish", "Subscribe", "Receive"] }"#,
    )?);

    let policy: PolicyEngine = PolicyBuilder::from_json(
        r#"{
            "Version": "2012-10-17",
            "Statement": {
                "Effect": "Allow",
                "Principal": { "AWS": "arn:aws:iam::111122223333:role/sensor" },
                "Action": "mqtt:Publish",
                "Resource": "arn:aws:iot:us-east-1:111122223333:topic/telemetry/*"
            }
        }"#,
    )
    .with_policy_type(PolicyType::Resource)
    .with_catalog(Arc::clone(&catalog))
    .build()?;

    println!(
        "mqtt:* covers Publish: {}",
        policy.action_matches("mqtt:Publish", ["mqtt:*"])?
    );

    // patterns are checked against the catalog before matching.
    if let Err(e) = policy.action_matches("mqtt:Publish", ["mqtt:Pub*", "mqtt:Delete*"]) {
        println!("{}", e);
    }

    Ok(())
}
