//! The policy-statement accumulator and its rendered form.

use std::collections::BTreeMap;

use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::arn::{ArnFields, ArnTemplate};
use crate::conditions::{ConditionEntry, ConditionValue, Operator};
use crate::errors::{ArnError, PolicyError};

/// Statement effect.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

/// Mutable accumulator for one policy statement.
///
/// A statement is built up through chained calls and rendered exactly once
/// via [`PolicyStatement::build`]. Actions de-duplicate, resources accumulate
/// positionally, and condition entries overwrite per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyStatement {
    sid: Option<String>,
    effect: Effect,
    actions: Vec<String>,
    resources: Vec<String>,
    conditions: BTreeMap<String, ConditionEntry>,
    pending_error: Option<ArnError>,
}

impl PolicyStatement {
    /// Start an empty statement with effect `Allow`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a statement carrying a `Sid`. The sid is fixed for the life of
    /// the statement.
    pub fn with_sid(sid: impl Into<String>) -> Self {
        Self {
            sid: Some(sid.into()),
            ..Self::default()
        }
    }

    /// The statement identifier, if one was set at construction.
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// Current effect of the statement.
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Switch the statement effect.
    pub fn set_effect(&mut self, effect: Effect) {
        self.effect = effect;
    }

    /// Insert an action string. Adding the same action twice has no
    /// additional effect; insertion order is preserved.
    pub fn add_action(&mut self, action: impl Into<String>) {
        let action = action.into();
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// Append a fully resolved ARN to the resource list. Resources are not
    /// de-duplicated.
    pub fn add_resource(&mut self, arn: impl Into<String>) {
        self.resources.push(arn.into());
    }

    /// Resolve an ARN template against the supplied identifiers and ambient
    /// slots, then append it. A resolution failure is recorded and surfaced
    /// by [`PolicyStatement::build`]; chaining never panics.
    pub fn add_resource_template(
        &mut self,
        template: &str,
        identifiers: &[(&str, &str)],
        account: Option<&str>,
        region: Option<&str>,
        partition: Option<&str>,
    ) {
        let fields = ArnFields::new(identifiers, account, region, partition);
        match ArnTemplate::resolve(template, &fields) {
            Ok(arn) => {
                debug!("resolved {} -> {}", template, arn);
                self.resources.push(arn);
            }
            Err(err) => {
                if self.pending_error.is_none() {
                    self.pending_error = Some(err);
                }
            }
        }
    }

    /// Store `(operator, value)` under `key`, overwriting any previous entry
    /// for the same key.
    pub fn set_condition(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConditionValue>,
        operator: Operator,
    ) {
        self.conditions.insert(
            key.into(),
            ConditionEntry {
                operator,
                value: value.into(),
            },
        );
    }

    /// Actions accumulated so far, in insertion order.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Resource ARNs accumulated so far, in insertion order.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Condition entries accumulated so far, keyed by condition key.
    pub fn conditions(&self) -> &BTreeMap<String, ConditionEntry> {
        &self.conditions
    }

    /// Render the accumulated state into a serializable [`Statement`].
    ///
    /// A statement with zero actions or resources renders fine; semantic
    /// validation is left to the IAM policy evaluator.
    ///
    /// # Errors
    /// Returns the first ARN template failure recorded by a chained resource
    /// call.
    pub fn build(self) -> Result<Statement, PolicyError> {
        if let Some(err) = self.pending_error {
            return Err(err.into());
        }
        if self.actions.is_empty() {
            warn!("rendering a statement with no actions");
        }

        let mut condition: BTreeMap<String, BTreeMap<String, ConditionValue>> = BTreeMap::new();
        for (key, entry) in self.conditions {
            condition
                .entry(entry.operator.as_str().to_string())
                .or_default()
                .insert(key, entry.value);
        }

        Ok(Statement {
            sid: self.sid,
            effect: self.effect,
            action: self.actions,
            resource: self.resources,
            condition,
        })
    }
}

/// A rendered policy statement in the standard IAM JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Optional statement identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// `Allow` or `Deny`.
    pub effect: Effect,
    /// Qualified action names.
    pub action: Vec<String>,
    /// Resource ARNs.
    pub resource: Vec<String>,
    /// Conditions grouped by operator, then key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: BTreeMap<String, BTreeMap<String, ConditionValue>>,
}

impl Statement {
    /// Serialize to a `serde_json::Value`.
    ///
    /// # Errors
    /// Returns [`PolicyError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, PolicyError> {
        serde_json::to_value(self).map_err(PolicyError::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn add_action_is_idempotent() {
        let mut statement = PolicyStatement::new();
        statement.add_action("elasticache:CreateCacheCluster");
        statement.add_action("elasticache:CreateCacheCluster");
        statement.add_action("elasticache:DeleteCacheCluster");
        assert_eq!(
            statement.actions(),
            [
                "elasticache:CreateCacheCluster",
                "elasticache:DeleteCacheCluster"
            ]
        );
    }

    #[test]
    fn resources_accumulate_positionally() {
        let mut statement = PolicyStatement::new();
        statement.add_resource("arn:aws:s3:::bucket-a");
        statement.add_resource("arn:aws:s3:::bucket-a");
        statement.add_resource("arn:aws:s3:::bucket-b");
        assert_eq!(
            statement.resources(),
            [
                "arn:aws:s3:::bucket-a",
                "arn:aws:s3:::bucket-a",
                "arn:aws:s3:::bucket-b"
            ]
        );
    }

    #[test]
    fn conditions_last_write_wins() {
        let mut statement = PolicyStatement::new();
        statement.set_condition("aws:ResourceTag/env", "dev", Operator::StringLike);
        statement.set_condition("aws:ResourceTag/env", "prod", Operator::StringEquals);
        let rendered = statement.build().unwrap();
        assert_eq!(
            rendered.to_json().unwrap()["Condition"],
            serde_json::json!({"StringEquals": {"aws:ResourceTag/env": "prod"}})
        );
    }

    #[test]
    fn template_failure_surfaces_at_build() {
        let mut statement = PolicyStatement::new();
        statement.add_action("elasticache:CreateCacheCluster");
        statement.add_resource_template(
            "arn:${Partition}:elasticache:${Region}:${Account}:cluster:${CacheClusterId}",
            &[],
            None,
            None,
            None,
        );
        let err = statement.build().unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Arn(ArnError::UnfilledPlaceholder { ref name, .. }) if name == "CacheClusterId"
        ));
    }

    #[test]
    fn renders_standard_shape() {
        let mut statement = PolicyStatement::with_sid("AllowRead");
        statement.add_action("s3:GetObject");
        statement.add_resource("arn:aws:s3:::bucket/*");
        statement.set_condition("aws:SecureTransport", true, Operator::Bool);
        let json = statement.build().unwrap().to_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Sid": "AllowRead",
                "Effect": "Allow",
                "Action": ["s3:GetObject"],
                "Resource": ["arn:aws:s3:::bucket/*"],
                "Condition": {"Bool": {"aws:SecureTransport": true}}
            })
        );
    }

    #[test]
    fn empty_statement_renders_without_condition_key() {
        let json = PolicyStatement::new().build().unwrap().to_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Effect": "Allow",
                "Action": [],
                "Resource": []
            })
        );
    }

    #[test]
    fn deny_effect_round_trips() {
        let mut statement = PolicyStatement::new();
        statement.set_effect(Effect::Deny);
        statement.add_action("s3:DeleteBucket");
        let rendered = statement.build().unwrap();
        assert_eq!(rendered.effect, Effect::Deny);
        assert_eq!(rendered.to_json().unwrap()["Effect"], "Deny");
    }

    #[test]
    fn conditions_group_by_operator() {
        let mut statement = PolicyStatement::new();
        statement.set_condition("aws:ResourceTag/env", "prod", Operator::StringLike);
        statement.set_condition("aws:ResourceTag/team", "core", Operator::StringLike);
        statement.set_condition("aws:MultiFactorAuthPresent", true, Operator::Bool);
        let json = statement.build().unwrap().to_json().unwrap();
        assert_eq!(
            json["Condition"],
            serde_json::json!({
                "Bool": {"aws:MultiFactorAuthPresent": true},
                "StringLike": {
                    "aws:ResourceTag/env": "prod",
                    "aws:ResourceTag/team": "core"
                }
            })
        );
    }
}
