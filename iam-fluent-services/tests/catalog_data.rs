//! Consistency checks over the generated reference catalogs.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use iam_fluent_core::{AccessLevel, ArnFields, ArnTemplate, Operator, ServiceCatalog};
use iam_fluent_services::{apigateway, autoscaling, ecs, elasticache, greengrass, quicksight};
use rstest::rstest;

fn catalogs() -> [&'static ServiceCatalog; 6] {
    [
        &apigateway::CATALOG,
        &autoscaling::CATALOG,
        &ecs::CATALOG,
        &elasticache::CATALOG,
        &greengrass::CATALOG,
        &quicksight::CATALOG,
    ]
}

#[test]
fn every_arn_template_parses_and_fills() {
    for catalog in catalogs() {
        for resource_type in catalog.resource_types {
            let template = ArnTemplate::parse(resource_type.arn_template).unwrap();
            let names: Vec<&str> = template
                .placeholders()
                .filter(|name| !matches!(*name, "Partition" | "Region" | "Account"))
                .collect();
            let values: Vec<(&str, &str)> = names.iter().map(|name| (*name, "x")).collect();
            let arn = template.fill(&ArnFields::new(&values, None, None, None)).unwrap();
            assert!(arn.starts_with("arn:aws:"), "{arn} is not an ARN");
            assert!(!arn.contains("${"), "{arn} kept a placeholder token");
        }
    }
}

#[test]
fn actions_reference_known_resource_types() {
    for catalog in catalogs() {
        for action in catalog.actions {
            for name in action.resource_types {
                assert!(
                    catalog.resource_type(name).is_some(),
                    "{}:{} references unknown resource type {name}",
                    catalog.service_prefix,
                    action.name
                );
            }
        }
    }
}

#[test]
fn service_scoped_condition_keys_resolve() {
    for catalog in catalogs() {
        let prefix = format!("{}:", catalog.service_prefix);
        for action in catalog.actions {
            for key in action.condition_keys {
                if key.starts_with(&prefix) {
                    assert!(
                        catalog.condition_key(key).is_some(),
                        "{}:{} uses undeclared condition key {key}",
                        catalog.service_prefix,
                        action.name
                    );
                }
            }
        }
    }
}

#[test]
fn names_are_unique_within_each_table() {
    for catalog in catalogs() {
        let actions: BTreeSet<&str> = catalog.actions.iter().map(|a| a.name).collect();
        assert_eq!(actions.len(), catalog.actions.len());
        let resources: BTreeSet<&str> = catalog.resource_types.iter().map(|r| r.name).collect();
        assert_eq!(resources.len(), catalog.resource_types.len());
        let keys: BTreeSet<&str> = catalog.condition_keys.iter().map(|k| k.name).collect();
        assert_eq!(keys.len(), catalog.condition_keys.len());
    }
}

#[test]
fn catalog_lookups_round_trip() {
    let catalog = &elasticache::CATALOG;
    let action = catalog.action("CreateCacheCluster").unwrap();
    assert_eq!(action.access_level, AccessLevel::Write);
    assert!(action.dependent_actions.contains(&"s3:GetObject"));
    assert_eq!(
        catalog.qualified_action(action.name),
        "elasticache:CreateCacheCluster"
    );
    assert!(catalog.action("CreateCacheKluster").is_none());

    let cluster = catalog.resource_type("cluster").unwrap();
    assert_eq!(
        cluster.arn_template,
        "arn:${Partition}:elasticache:${Region}:${Account}:cluster:${CacheClusterId}"
    );
}

#[rstest]
#[case("elasticache:CacheNodeType", Operator::StringLike)]
#[case("elasticache:NumNodeGroups", Operator::NumericEquals)]
#[case("elasticache:AtRestEncryptionEnabled", Operator::Bool)]
fn condition_keys_carry_default_operators(#[case] key: &str, #[case] expected: Operator) {
    let def = elasticache::CATALOG.condition_key(key).unwrap();
    assert_eq!(def.default_operator(), expected);
}

#[test]
fn access_level_filter_matches_annotations() {
    let tagging: Vec<&str> = elasticache::CATALOG
        .actions_with_access_level(AccessLevel::Tagging)
        .map(|action| action.name)
        .collect();
    assert_eq!(tagging, ["AddTagsToResource", "RemoveTagsFromResource"]);

    let permissions: Vec<&str> = quicksight::CATALOG
        .actions_with_access_level(AccessLevel::PermissionsManagement)
        .map(|action| action.name)
        .collect();
    assert_eq!(
        permissions,
        ["CreateIAMPolicyAssignment", "UpdateDashboardPermissions"]
    );
}

#[test]
fn greengrass_declares_no_service_condition_keys() {
    assert!(greengrass::CATALOG.condition_keys.is_empty());
    assert!(greengrass::CATALOG
        .actions
        .iter()
        .all(|action| action
            .condition_keys
            .iter()
            .all(|key| key.starts_with("aws:"))));
}
