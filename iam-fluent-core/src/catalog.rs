//! Static per-service reference tables.
//!
//! Each service crate carries one [`ServiceCatalog`] generated at build time
//! from its authorization reference table. The tables are plain `'static`
//! data with no initialization-order dependency, so they need no lazy setup.

use crate::access_level::AccessLevel;
use crate::conditions::{ConditionValueType, Operator};

/// An IAM action and its reference metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDef {
    /// Action name without the service prefix (e.g. `CreateCacheCluster`).
    pub name: &'static str,
    /// The documented access level of the action.
    pub access_level: AccessLevel,
    /// Fully qualified actions implicitly required alongside this one.
    /// Advisory metadata; the builder never adds them on its own.
    pub dependent_actions: &'static [&'static str],
    /// Resource type names this action applies to.
    pub resource_types: &'static [&'static str],
    /// Condition keys that may narrow this action.
    pub condition_keys: &'static [&'static str],
}

/// A resource type, its ARN template, and the condition keys valid on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTypeDef {
    /// Resource type name (e.g. `autoScalingGroup`).
    pub name: &'static str,
    /// ARN template with `${...}` placeholder slots.
    pub arn_template: &'static str,
    /// Condition keys valid on this resource type.
    pub condition_keys: &'static [&'static str],
}

/// A condition key and its declared value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionKeyDef {
    /// Fully qualified key name (e.g. `elasticache:CacheNodeType`).
    pub name: &'static str,
    /// Declared value shape, which fixes the default operator.
    pub value_type: ConditionValueType,
}

impl ConditionKeyDef {
    /// Default operator applied when a caller does not pick one.
    pub const fn default_operator(&self) -> Operator {
        self.value_type.default_operator()
    }
}

/// All reference data for one service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceCatalog {
    /// The service prefix used in action names and ARNs (e.g. `elasticache`).
    pub service_prefix: &'static str,
    /// Action table.
    pub actions: &'static [ActionDef],
    /// Resource type table.
    pub resource_types: &'static [ResourceTypeDef],
    /// Condition key table (service-scoped keys only).
    pub condition_keys: &'static [ConditionKeyDef],
}

impl ServiceCatalog {
    /// Look up an action by its unprefixed name.
    pub fn action(&self, name: &str) -> Option<&'static ActionDef> {
        self.actions.iter().find(|action| action.name == name)
    }

    /// Look up a resource type by name.
    pub fn resource_type(&self, name: &str) -> Option<&'static ResourceTypeDef> {
        self.resource_types.iter().find(|rt| rt.name == name)
    }

    /// Look up a condition key by its fully qualified name.
    pub fn condition_key(&self, name: &str) -> Option<&'static ConditionKeyDef> {
        self.condition_keys.iter().find(|key| key.name == name)
    }

    /// All actions documented at the given access level.
    pub fn actions_with_access_level(
        &self,
        level: AccessLevel,
    ) -> impl Iterator<Item = &'static ActionDef> {
        self.actions
            .iter()
            .filter(move |action| action.access_level == level)
    }

    /// Qualify an unprefixed action name with the service prefix.
    pub fn qualified_action(&self, name: &str) -> String {
        format!("{}:{}", self.service_prefix, name)
    }
}
