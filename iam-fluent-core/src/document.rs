//! Policy document assembly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::PolicyError;
use crate::statement::Statement;

/// A complete IAM policy document: a version marker plus rendered statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocument {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: String,
    /// Statements in insertion order.
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// The current IAM policy language version.
    pub const VERSION: &'static str = "2012-10-17";

    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            version: Self::VERSION.to_string(),
            statements: Vec::new(),
        }
    }

    /// Append a statement.
    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Append a statement, chaining style.
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.add_statement(statement);
        self
    }

    /// Whether the document holds no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Serialize to a `serde_json::Value`.
    ///
    /// # Errors
    /// Returns [`PolicyError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, PolicyError> {
        serde_json::to_value(self).map_err(PolicyError::from)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns [`PolicyError::Serialization`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, PolicyError> {
        serde_json::to_string_pretty(self).map_err(PolicyError::from)
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new()
    }
}
