//! End-to-end chains through the generated builders.

#![allow(clippy::unwrap_used)]

use iam_fluent_services::{
    AccessLevel, Apigateway, Autoscaling, Ecs, Elasticache, Greengrass, Operator, PolicyDocument,
    Quicksight, StatementBuilder,
};
use rstest::rstest;

#[test]
fn tagged_cluster_statement_renders_standard_shape() {
    let json = Elasticache::with_sid("AllowTaggedClusterOps")
        .to_create_cache_cluster()
        .on_cluster("my-cluster", Some("111111111111"), Some("us-east-1"), None)
        .if_aws_resource_tag("env", "prod")
        .to_json()
        .unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "Sid": "AllowTaggedClusterOps",
            "Effect": "Allow",
            "Action": ["elasticache:CreateCacheCluster"],
            "Resource": ["arn:aws:elasticache:us-east-1:111111111111:cluster:my-cluster"],
            "Condition": {
                "StringLike": {"aws:ResourceTag/env": "prod"}
            }
        })
    );
}

#[test]
fn ambient_slots_default_to_wildcards() {
    let statement = Autoscaling::new()
        .to_update_auto_scaling_group()
        .on_auto_scaling_group("123", "myGroup", None, None, None)
        .build()
        .unwrap();

    assert_eq!(
        statement.resource,
        ["arn:aws:autoscaling:*:*:autoScalingGroup:123:autoScalingGroupName/myGroup"]
    );
}

#[rstest]
#[case(None, None, "arn:aws:apigateway:*::/restapis/a1b2c3")]
#[case(Some("us-east-1"), None, "arn:aws:apigateway:us-east-1::/restapis/a1b2c3")]
#[case(None, Some("aws-cn"), "arn:aws-cn:apigateway:*::/restapis/a1b2c3")]
fn rest_api_arn_has_no_account_segment(
    #[case] region: Option<&str>,
    #[case] partition: Option<&str>,
    #[case] expected: &str,
) {
    let statement = Apigateway::new()
        .to_get()
        .on_rest_api("a1b2c3", None, region, partition)
        .build()
        .unwrap();
    assert_eq!(statement.resource, [expected]);
}

#[test]
fn multi_identifier_arn_fills_in_template_order() {
    let statement = Ecs::new()
        .to_run_task()
        .on_task_definition("web", "12", None, None, None)
        .build()
        .unwrap();
    assert_eq!(statement.resource, ["arn:aws:ecs:*:*:task-definition/web:12"]);
}

#[test]
fn repeated_actions_deduplicate_in_order() {
    let statement = Elasticache::new()
        .to_create_cache_cluster()
        .to_delete_cache_cluster()
        .to_create_cache_cluster()
        .build()
        .unwrap();
    assert_eq!(
        statement.action,
        [
            "elasticache:CreateCacheCluster",
            "elasticache:DeleteCacheCluster"
        ]
    );
}

#[test]
fn repeated_resources_accumulate_positionally() {
    let statement = Elasticache::new()
        .on_cluster("c1", None, None, None)
        .on_cluster("c1", None, None, None)
        .on_cluster("c2", None, None, None)
        .build()
        .unwrap();
    assert_eq!(
        statement.resource,
        [
            "arn:aws:elasticache:*:*:cluster:c1",
            "arn:aws:elasticache:*:*:cluster:c1",
            "arn:aws:elasticache:*:*:cluster:c2"
        ]
    );
}

#[test]
fn condition_key_overwrites_on_repeat() {
    let json = Autoscaling::new()
        .if_instance_type("t2.micro", None)
        .if_instance_type("m5.large", Some(Operator::StringEquals))
        .to_json()
        .unwrap();
    assert_eq!(
        json["Condition"],
        serde_json::json!({
            "StringEquals": {"autoscaling:InstanceType": "m5.large"}
        })
    );
}

#[test]
fn bool_condition_defaults_to_true() {
    let json = Elasticache::new()
        .if_at_rest_encryption_enabled(None)
        .if_transit_encryption_enabled(false)
        .to_json()
        .unwrap();
    assert_eq!(
        json["Condition"],
        serde_json::json!({
            "Bool": {
                "elasticache:AtRestEncryptionEnabled": true,
                "elasticache:TransitEncryptionEnabled": false
            }
        })
    );
}

#[test]
fn numeric_condition_defaults_to_numeric_equals() {
    let json = Autoscaling::new()
        .if_max_size(10, None)
        .if_min_size(2, Some(Operator::NumericGreaterThanEquals))
        .to_json()
        .unwrap();
    assert_eq!(
        json["Condition"],
        serde_json::json!({
            "NumericEquals": {"autoscaling:MaxSize": 10},
            "NumericGreaterThanEquals": {"autoscaling:MinSize": 2}
        })
    );
}

#[test]
fn tag_parameterized_service_key_takes_the_tag_name() {
    let json = Autoscaling::new()
        .if_resource_tag("env", "prod", None)
        .to_json()
        .unwrap();
    assert_eq!(
        json["Condition"],
        serde_json::json!({
            "StringLike": {"autoscaling:ResourceTag/env": "prod"}
        })
    );
}

#[test]
fn arn_valued_condition_key_defaults_to_arn_like() {
    let json = Ecs::new()
        .to_describe_services()
        .if_cluster("arn:aws:ecs:us-east-1:111111111111:cluster/prod", None)
        .to_json()
        .unwrap();
    assert_eq!(
        json["Condition"],
        serde_json::json!({
            "ArnLike": {"ecs:cluster": "arn:aws:ecs:us-east-1:111111111111:cluster/prod"}
        })
    );
}

#[test]
fn to_all_adds_the_wildcard_action() {
    let statement = Greengrass::new()
        .to_all()
        .on_all_resources()
        .build()
        .unwrap();
    assert_eq!(statement.action, ["greengrass:*"]);
    assert_eq!(statement.resource, ["*"]);
}

#[test]
fn to_access_level_expands_from_the_catalog() {
    let statement = Apigateway::new()
        .to_access_level(AccessLevel::Write)
        .build()
        .unwrap();
    assert_eq!(
        statement.action,
        [
            "apigateway:DELETE",
            "apigateway:PATCH",
            "apigateway:POST",
            "apigateway:PUT",
            "apigateway:SetWebACL"
        ]
    );

    let tagging = Quicksight::new()
        .to_access_level(AccessLevel::Tagging)
        .build()
        .unwrap();
    assert_eq!(
        tagging.action,
        ["quicksight:TagResource", "quicksight:UntagResource"]
    );
}

#[test]
fn deny_statements_render_the_deny_effect() {
    let json = Ecs::with_sid("DenyTaskLaunch")
        .deny()
        .to_run_task()
        .on_all_resources()
        .to_json()
        .unwrap();
    assert_eq!(json["Effect"], "Deny");
    assert_eq!(json["Sid"], "DenyTaskLaunch");
}

#[test]
fn generated_and_generic_calls_mix_in_one_chain() {
    let statement = Quicksight::new()
        .to_create_dashboard()
        .to_action("s3:GetObject")
        .on_dashboard("sales-q3", None, None, None)
        .on("arn:aws:s3:::report-assets/*")
        .if_aws_request_tag("team", "bi")
        .build()
        .unwrap();
    assert_eq!(
        statement.action,
        ["quicksight:CreateDashboard", "s3:GetObject"]
    );
    assert_eq!(
        statement.resource,
        [
            "arn:aws:quicksight:*:*:dashboard/sales-q3",
            "arn:aws:s3:::report-assets/*"
        ]
    );
}

#[test]
fn document_collects_statements_under_the_fixed_version() {
    let document = PolicyDocument::new()
        .with_statement(
            Elasticache::with_sid("AllowReads")
                .to_access_level(AccessLevel::List)
                .on_all_resources()
                .build()
                .unwrap(),
        )
        .with_statement(
            Ecs::with_sid("DenyStop")
                .deny()
                .to_stop_task()
                .on_all_resources()
                .build()
                .unwrap(),
        );

    let json = document.to_json().unwrap();
    assert_eq!(json["Version"], "2012-10-17");
    assert_eq!(json["Statement"].as_array().unwrap().len(), 2);
    assert_eq!(json["Statement"][1]["Effect"], "Deny");
}
