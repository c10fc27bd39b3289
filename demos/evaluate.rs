use iam_policy_engine::{Decision, PolicyBuilder, PolicyType, Request, Result};

fn main() -> Result<()> {
    let json = r#"{
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Action": ["s3:GetObject", "s3:PutObject"],
                "Resource": "arn:aws:s3:::amzn-s3-demo-bucket/*"
            },
            {
                "Effect": "Deny",
                "Action": "s3:PutObject",
                "Resource": "arn:aws:s3:::amzn-s3-demo-bucket/readonly/*"
            }
        ]
    }"#;

    // Construct the policy.
    let policy = PolicyBuilder::from_json(json)
        .with_policy_type(PolicyType::Identity)
        .with_default_decision(Decision::Denied)
        .build()?;

    for (action, resource) in &[
        ("s3:GetObject", "arn:aws:s3:::amzn-s3-demo-bucket/readonly/report.pdf"),
        ("s3:PutObject", "arn:aws:s3:::amzn-s3-demo-bucket/uploads/photo.jpg"),
        ("s3:PutObject", "arn:aws:s3:::amzn-s3-demo-bucket/readonly/report.pdf"),
    ] {
        let request = Request::new(*action, *resource)?;
        match policy.evaluate(&request)? {
            Decision::Allowed => println!("Allowed {} on {}", action, resource),
            Decision::Denied => println!("Denied  {} on {}", action, resource),
        }
    }

    Ok(())
}
