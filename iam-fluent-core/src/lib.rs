//! Core building blocks for fluent IAM policy-statement construction:
//! - the [`PolicyStatement`] accumulator and the [`StatementBuilder`] chaining surface
//! - structured ARN templates with loud failure on unfilled slots
//! - condition operators, value shapes, and access-level classification
//! - static [`ServiceCatalog`] tables that generated service crates populate
//!
//! The per-service fluent builders live in `iam-fluent-services`, generated
//! at build time from authorization reference tables; everything here is the
//! generic machinery those builders delegate to.

mod access_level;
mod arn;
mod builder;
mod catalog;
mod conditions;
mod document;
mod errors;
mod statement;

pub use access_level::AccessLevel;
pub use arn::{ArnFields, ArnTemplate, DEFAULT_PARTITION, WILDCARD};
pub use builder::StatementBuilder;
pub use catalog::{ActionDef, ConditionKeyDef, ResourceTypeDef, ServiceCatalog};
pub use conditions::{ConditionEntry, ConditionValue, ConditionValueType, Operator};
pub use document::PolicyDocument;
pub use errors::{ArnError, PolicyError, Result};
pub use statement::{Effect, PolicyStatement, Statement};
