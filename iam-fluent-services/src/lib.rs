//! Generated fluent statement builders, one per AWS service.
//!
//! Every builder is generated at build time from the service's
//! authorization reference table, so the `to_*` (actions), `on_*`
//! (resource ARNs) and `if_*` (condition keys) methods track the table
//! instead of being maintained by hand. The shared chaining surface comes
//! from [`StatementBuilder`].
//!
//! ```
//! use iam_fluent_services::{Elasticache, StatementBuilder};
//!
//! let statement = Elasticache::with_sid("AllowTaggedClusterOps")
//!     .to_create_cache_cluster()
//!     .on_cluster("my-cluster", None, None, None)
//!     .if_aws_resource_tag("env", "prod")
//!     .build()
//!     .unwrap();
//! assert_eq!(statement.action, ["elasticache:CreateCacheCluster"]);
//! assert_eq!(statement.resource, ["arn:aws:elasticache:*:*:cluster:my-cluster"]);
//! ```

pub use iam_fluent_core::{
    AccessLevel, ActionDef, ConditionKeyDef, ConditionValue, Effect, Operator, PolicyDocument,
    PolicyError, ResourceTypeDef, ServiceCatalog, Statement, StatementBuilder,
};

include!(concat!(env!("OUT_DIR"), "/services.rs"));
