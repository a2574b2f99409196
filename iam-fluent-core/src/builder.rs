//! The fluent chaining surface shared by every service builder.

use crate::conditions::{ConditionValue, Operator};
use crate::errors::PolicyError;
use crate::statement::{Effect, PolicyStatement, Statement};

/// Fluent access to an underlying [`PolicyStatement`].
///
/// Generated service builders implement the three accessors and inherit the
/// raw primitives plus the global (`aws:`) condition helpers, so a chain can
/// mix typed per-service calls with the generic surface:
///
/// ```
/// use iam_fluent_core::{Operator, PolicyStatement, StatementBuilder};
///
/// let statement = PolicyStatement::with_sid("AllowTaggedRead")
///     .to_action("s3:GetObject")
///     .on("arn:aws:s3:::my-bucket/*")
///     .if_aws_resource_tag("env", "prod")
///     .build()
///     .unwrap();
/// assert_eq!(statement.action, ["s3:GetObject"]);
/// ```
pub trait StatementBuilder: Sized {
    /// The statement being accumulated.
    fn statement(&self) -> &PolicyStatement;

    /// Mutable access to the statement being accumulated.
    fn statement_mut(&mut self) -> &mut PolicyStatement;

    /// Surrender the accumulated statement.
    fn into_statement(self) -> PolicyStatement;

    /// Set the effect to `Allow` (the default).
    fn allow(mut self) -> Self {
        self.statement_mut().set_effect(Effect::Allow);
        self
    }

    /// Set the effect to `Deny`.
    fn deny(mut self) -> Self {
        self.statement_mut().set_effect(Effect::Deny);
        self
    }

    /// Add a raw action string. No validation is performed against any
    /// catalog; duplicates are idempotent.
    fn to_action(mut self, action: &str) -> Self {
        self.statement_mut().add_action(action);
        self
    }

    /// Append a fully resolved resource ARN.
    fn on(mut self, arn: impl Into<String>) -> Self {
        self.statement_mut().add_resource(arn);
        self
    }

    /// Append the `*` wildcard resource.
    fn on_all_resources(self) -> Self {
        self.on("*")
    }

    /// Store a condition entry under `key`, overwriting any previous entry
    /// for that key.
    fn if_condition(
        mut self,
        key: impl Into<String>,
        value: impl Into<ConditionValue>,
        operator: Operator,
    ) -> Self {
        self.statement_mut().set_condition(key, value, operator);
        self
    }

    /// Render the statement.
    ///
    /// # Errors
    /// Surfaces any ARN template failure recorded during chaining.
    fn build(self) -> Result<Statement, PolicyError> {
        self.into_statement().build()
    }

    /// Render the statement straight to JSON.
    ///
    /// # Errors
    /// Surfaces chaining failures and serialization errors.
    fn to_json(self) -> Result<serde_json::Value, PolicyError> {
        self.build()?.to_json()
    }

    // Global condition keys, available on every service.

    /// Filter by a tag attached to the resource (`aws:ResourceTag/<key>`).
    fn if_aws_resource_tag(self, tag_key: &str, value: &str) -> Self {
        self.if_condition(
            format!("aws:ResourceTag/{}", tag_key),
            value,
            Operator::StringLike,
        )
    }

    /// Filter by a tag passed in the request (`aws:RequestTag/<key>`).
    fn if_aws_request_tag(self, tag_key: &str, value: &str) -> Self {
        self.if_condition(
            format!("aws:RequestTag/{}", tag_key),
            value,
            Operator::StringLike,
        )
    }

    /// Filter by the tag keys present in the request.
    fn if_aws_tag_keys(self, keys: &[&str]) -> Self {
        self.if_condition("aws:TagKeys", keys, Operator::StringLike)
    }

    /// Filter by the region the request was made to.
    fn if_aws_requested_region(self, region: &str) -> Self {
        self.if_condition("aws:RequestedRegion", region, Operator::StringLike)
    }

    /// Filter by the ARN of the resource making a service-to-service request.
    fn if_aws_source_arn(self, arn: &str) -> Self {
        self.if_condition("aws:SourceArn", arn, Operator::ArnLike)
    }

    /// Filter by the account of the resource making a service-to-service
    /// request.
    fn if_aws_source_account(self, account: &str) -> Self {
        self.if_condition("aws:SourceAccount", account, Operator::StringLike)
    }

    /// Filter by the principal's ARN.
    fn if_aws_principal_arn(self, arn: &str) -> Self {
        self.if_condition("aws:PrincipalArn", arn, Operator::ArnLike)
    }

    /// Filter by the services a request was made through.
    fn if_aws_called_via(self, services: &[&str]) -> Self {
        self.if_condition("aws:CalledVia", services, Operator::StringLike)
    }

    /// Filter on whether the request used TLS. Defaults to `true`.
    fn if_aws_secure_transport(self, value: impl Into<Option<bool>>) -> Self {
        self.if_condition(
            "aws:SecureTransport",
            value.into().unwrap_or(true),
            Operator::Bool,
        )
    }

    /// Filter on whether MFA was used. Defaults to `true`.
    fn if_aws_multi_factor_auth_present(self, value: impl Into<Option<bool>>) -> Self {
        self.if_condition(
            "aws:MultiFactorAuthPresent",
            value.into().unwrap_or(true),
            Operator::Bool,
        )
    }

    /// Filter by the request time.
    fn if_aws_current_time(self, value: &str, operator: Option<Operator>) -> Self {
        self.if_condition(
            "aws:CurrentTime",
            value,
            operator.unwrap_or(Operator::DateEquals),
        )
    }
}

impl StatementBuilder for PolicyStatement {
    fn statement(&self) -> &PolicyStatement {
        self
    }

    fn statement_mut(&mut self) -> &mut PolicyStatement {
        self
    }

    fn into_statement(self) -> PolicyStatement {
        self
    }
}
