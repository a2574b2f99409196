//! Generates the per-service reference catalogs and fluent statement
//! builders from the authorization reference tables under `data/`.
//!
//! Each `data/<service>.json` file becomes one module in
//! `$OUT_DIR/services.rs` carrying the static `ACTIONS`, `RESOURCE_TYPES`
//! and `CONDITION_KEYS` tables, a `CATALOG` tying them together, and a
//! builder struct with one `to_*` method per action, one `on_*` method per
//! resource type and one `if_*` method per service condition key. Table
//! inconsistencies (an action referencing an unknown resource type, a
//! condition key missing the service prefix, two entries snake-casing to
//! the same method name) abort the build.

use std::collections::BTreeSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceReference {
    name: String,
    display_name: String,
    actions: Vec<ActionRef>,
    resources: Vec<ResourceRef>,
    condition_keys: Vec<ConditionKeyRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ActionRef {
    name: String,
    annotations: Annotations,
    #[serde(default)]
    resources: Vec<NameRef>,
    #[serde(default)]
    action_condition_keys: Vec<String>,
    #[serde(default)]
    dependent_actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Annotations {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Properties {
    is_list: bool,
    is_permission_management: bool,
    is_tagging_only: bool,
    is_write: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NameRef {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceRef {
    name: String,
    #[serde(rename = "ARNFormats")]
    arn_formats: Vec<String>,
    #[serde(default)]
    condition_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConditionKeyRef {
    name: String,
    types: Vec<String>,
}

/// Method names already taken by the builder struct or the
/// `StatementBuilder` trait. A generated method colliding with one of
/// these would shadow the shared surface, so the build rejects it.
const RESERVED_METHODS: &[&str] = &[
    "new",
    "with_sid",
    "catalog",
    "to_all",
    "to_access_level",
    "statement",
    "statement_mut",
    "into_statement",
    "allow",
    "deny",
    "to_action",
    "on",
    "on_all_resources",
    "if_condition",
    "build",
    "to_json",
    "if_aws_resource_tag",
    "if_aws_request_tag",
    "if_aws_tag_keys",
    "if_aws_requested_region",
    "if_aws_source_arn",
    "if_aws_source_account",
    "if_aws_principal_arn",
    "if_aws_called_via",
    "if_aws_secure_transport",
    "if_aws_multi_factor_auth_present",
    "if_aws_current_time",
];

/// Rust keywords a sanitized table name must not collide with. Emitting one
/// as a method or parameter name would fail compilation with an opaque
/// error, so the build rejects it with the offending table entry instead.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn main() {
    println!("cargo:rerun-if-changed=data");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");

    let mut table_paths: Vec<PathBuf> = fs::read_dir("data")
        .expect("data directory is readable")
        .map(|entry| entry.expect("data directory entry is readable").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    table_paths.sort();

    let mut out = String::from(
        "// @generated from data/*.json by build.rs. Do not edit by hand.\n\n",
    );
    let mut exports = Vec::new();

    for path in &table_paths {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let service: ServiceReference = serde_json::from_str(&raw)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        exports.push(generate_module(&mut out, &service));
    }

    for (module, struct_name) in &exports {
        let _ = writeln!(out, "pub use {module}::{struct_name};");
    }

    fs::write(Path::new(&out_dir).join("services.rs"), out)
        .expect("generated services.rs is writable");
}

/// Emit one service module. Returns `(module_name, struct_name)` for the
/// crate-root re-export.
fn generate_module(out: &mut String, service: &ServiceReference) -> (String, String) {
    let prefix = service.name.as_str();
    let module = ident(prefix);
    let struct_name = sanitized(prefix).to_case(Case::Pascal);
    validate(service);

    let mut used: BTreeSet<String> = RESERVED_METHODS
        .iter()
        .map(|name| (*name).to_string())
        .collect();

    let _ = writeln!(
        out,
        "/// Statement builder module for {} (`{prefix}`).",
        service.display_name
    );
    let _ = writeln!(out, "pub mod {module} {{");
    out.push_str("    use iam_fluent_core::{PolicyStatement, ServiceCatalog, StatementBuilder};\n\n");

    emit_action_table(out, service);
    emit_resource_table(out, service);
    emit_condition_key_table(out, service);

    let _ = writeln!(out, "    /// Complete reference catalog for `{prefix}`.");
    let _ = writeln!(out, "    pub static CATALOG: ServiceCatalog = ServiceCatalog {{");
    let _ = writeln!(out, "        service_prefix: {prefix:?},");
    out.push_str("        actions: ACTIONS,\n");
    out.push_str("        resource_types: RESOURCE_TYPES,\n");
    out.push_str("        condition_keys: CONDITION_KEYS,\n");
    out.push_str("    };\n\n");

    let _ = writeln!(
        out,
        "    /// Fluent statement builder for {} actions.",
        service.display_name
    );
    out.push_str("    #[derive(Debug, Clone, Default)]\n");
    let _ = writeln!(out, "    pub struct {struct_name} {{");
    out.push_str("        statement: PolicyStatement,\n");
    out.push_str("    }\n\n");

    let _ = writeln!(out, "    impl {struct_name} {{");
    let _ = writeln!(out, "        /// Start an empty `{prefix}` statement.");
    out.push_str("        pub fn new() -> Self {\n");
    out.push_str("            Self::default()\n");
    out.push_str("        }\n\n");
    out.push_str("        /// Start a statement carrying a `Sid`.\n");
    out.push_str("        pub fn with_sid(sid: impl Into<String>) -> Self {\n");
    out.push_str("            Self {\n");
    out.push_str("                statement: PolicyStatement::with_sid(sid),\n");
    out.push_str("            }\n");
    out.push_str("        }\n\n");
    out.push_str("        /// The reference catalog backing this builder.\n");
    out.push_str("        pub fn catalog() -> &'static ServiceCatalog {\n");
    out.push_str("            &CATALOG\n");
    out.push_str("        }\n\n");
    let _ = writeln!(out, "        /// Add the `{prefix}:*` wildcard action.");
    out.push_str("        pub fn to_all(mut self) -> Self {\n");
    let _ = writeln!(out, "            self.statement.add_action({:?});", format!("{prefix}:*"));
    out.push_str("            self\n");
    out.push_str("        }\n\n");
    out.push_str("        /// Add every action documented at the given access level.\n");
    out.push_str(
        "        pub fn to_access_level(mut self, level: iam_fluent_core::AccessLevel) -> Self {\n",
    );
    out.push_str("            for action in CATALOG.actions_with_access_level(level) {\n");
    out.push_str(
        "                self.statement.add_action(CATALOG.qualified_action(action.name));\n",
    );
    out.push_str("            }\n");
    out.push_str("            self\n");
    out.push_str("        }\n\n");

    for action in &service.actions {
        emit_action_method(out, prefix, action, &mut used);
    }
    for resource in &service.resources {
        emit_resource_method(out, resource, &mut used);
    }
    for key in &service.condition_keys {
        emit_condition_method(out, prefix, key, &mut used);
    }

    // Trim the trailing blank line left by the last method.
    if out.ends_with("\n\n") {
        out.pop();
    }
    out.push_str("    }\n\n");

    let _ = writeln!(out, "    impl StatementBuilder for {struct_name} {{");
    out.push_str("        fn statement(&self) -> &PolicyStatement {\n");
    out.push_str("            &self.statement\n");
    out.push_str("        }\n\n");
    out.push_str("        fn statement_mut(&mut self) -> &mut PolicyStatement {\n");
    out.push_str("            &mut self.statement\n");
    out.push_str("        }\n\n");
    out.push_str("        fn into_statement(self) -> PolicyStatement {\n");
    out.push_str("            self.statement\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");

    (module, struct_name)
}

fn validate(service: &ServiceReference) {
    let resource_names: BTreeSet<&str> = service
        .resources
        .iter()
        .map(|resource| resource.name.as_str())
        .collect();
    for action in &service.actions {
        for resource in &action.resources {
            assert!(
                resource_names.contains(resource.name.as_str()),
                "{}: action {} references unknown resource type {}",
                service.name,
                action.name,
                resource.name
            );
        }
    }
    for resource in &service.resources {
        assert!(
            !resource.arn_formats.is_empty(),
            "{}: resource type {} has no ARN format",
            service.name,
            resource.name
        );
    }
    let service_prefix = format!("{}:", service.name);
    for key in &service.condition_keys {
        assert!(
            key.name.starts_with(&service_prefix),
            "{}: condition key {} lacks the service prefix",
            service.name,
            key.name
        );
        assert!(
            !key.types.is_empty(),
            "{}: condition key {} declares no value type",
            service.name,
            key.name
        );
    }
}

fn emit_action_table(out: &mut String, service: &ServiceReference) {
    out.push_str("    /// Action reference table.\n");
    out.push_str("    pub const ACTIONS: &[iam_fluent_core::ActionDef] = &[\n");
    for action in &service.actions {
        let resource_types: Vec<String> = action
            .resources
            .iter()
            .map(|resource| resource.name.clone())
            .collect();
        out.push_str("        iam_fluent_core::ActionDef {\n");
        let _ = writeln!(out, "            name: {:?},", action.name);
        let _ = writeln!(
            out,
            "            access_level: iam_fluent_core::AccessLevel::{},",
            access_level_variant(&action.annotations.properties)
        );
        let _ = writeln!(
            out,
            "            dependent_actions: {},",
            str_slice(&action.dependent_actions)
        );
        let _ = writeln!(out, "            resource_types: {},", str_slice(&resource_types));
        let _ = writeln!(
            out,
            "            condition_keys: {},",
            str_slice(&action.action_condition_keys)
        );
        out.push_str("        },\n");
    }
    out.push_str("    ];\n\n");
}

fn emit_resource_table(out: &mut String, service: &ServiceReference) {
    out.push_str("    /// Resource type reference table.\n");
    out.push_str("    pub const RESOURCE_TYPES: &[iam_fluent_core::ResourceTypeDef] = &[\n");
    for resource in &service.resources {
        out.push_str("        iam_fluent_core::ResourceTypeDef {\n");
        let _ = writeln!(out, "            name: {:?},", resource.name);
        let _ = writeln!(
            out,
            "            arn_template: {:?},",
            resource.arn_formats[0]
        );
        let _ = writeln!(
            out,
            "            condition_keys: {},",
            str_slice(&resource.condition_keys)
        );
        out.push_str("        },\n");
    }
    out.push_str("    ];\n\n");
}

fn emit_condition_key_table(out: &mut String, service: &ServiceReference) {
    out.push_str("    /// Service-scoped condition key reference table.\n");
    out.push_str("    pub const CONDITION_KEYS: &[iam_fluent_core::ConditionKeyDef] = &[\n");
    for key in &service.condition_keys {
        out.push_str("        iam_fluent_core::ConditionKeyDef {\n");
        let _ = writeln!(out, "            name: {:?},", key.name);
        let _ = writeln!(
            out,
            "            value_type: iam_fluent_core::ConditionValueType::{},",
            value_type_variant(&key.types[0])
        );
        out.push_str("        },\n");
    }
    out.push_str("    ];\n\n");
}

fn emit_action_method(
    out: &mut String,
    prefix: &str,
    action: &ActionRef,
    used: &mut BTreeSet<String>,
) {
    let method = format!("to_{}", ident(&action.name));
    claim(used, &method, &action.name);

    let _ = writeln!(
        out,
        "        /// Add the `{prefix}:{}` action ({} access).",
        action.name,
        access_level_label(&action.annotations.properties)
    );
    if !action.dependent_actions.is_empty() {
        out.push_str("        ///\n");
        let quoted: Vec<String> = action
            .dependent_actions
            .iter()
            .map(|dep| format!("`{dep}`"))
            .collect();
        let _ = writeln!(out, "        /// Also requires: {}.", quoted.join(", "));
    }
    let _ = writeln!(out, "        pub fn {method}(mut self) -> Self {{");
    let _ = writeln!(
        out,
        "            self.statement.add_action({:?});",
        format!("{prefix}:{}", action.name)
    );
    out.push_str("            self\n");
    out.push_str("        }\n\n");
}

fn emit_resource_method(out: &mut String, resource: &ResourceRef, used: &mut BTreeSet<String>) {
    let method = format!("on_{}", ident(&resource.name));
    claim(used, &method, &resource.name);

    let template = &resource.arn_formats[0];
    let identifiers: Vec<String> = placeholders(template)
        .into_iter()
        .filter(|name| !matches!(name.as_str(), "Partition" | "Region" | "Account"))
        .collect();

    let _ = writeln!(
        out,
        "        /// Scope to a `{}` resource (`{template}`).",
        resource.name
    );
    let _ = writeln!(out, "        pub fn {method}(");
    out.push_str("            mut self,\n");
    for name in &identifiers {
        let _ = writeln!(out, "            {}: &str,", ident(name));
    }
    out.push_str("            account: Option<&str>,\n");
    out.push_str("            region: Option<&str>,\n");
    out.push_str("            partition: Option<&str>,\n");
    out.push_str("        ) -> Self {\n");
    out.push_str("            self.statement.add_resource_template(\n");
    let _ = writeln!(out, "                {template:?},");
    if identifiers.is_empty() {
        out.push_str("                &[],\n");
    } else {
        out.push_str("                &[\n");
        for name in &identifiers {
            let _ = writeln!(out, "                    ({name:?}, {}),", ident(name));
        }
        out.push_str("                ],\n");
    }
    out.push_str("                account,\n");
    out.push_str("                region,\n");
    out.push_str("                partition,\n");
    out.push_str("            );\n");
    out.push_str("            self\n");
    out.push_str("        }\n\n");
}

fn emit_condition_method(
    out: &mut String,
    prefix: &str,
    key: &ConditionKeyRef,
    used: &mut BTreeSet<String>,
) {
    let local = key
        .name
        .strip_prefix(&format!("{prefix}:"))
        .unwrap_or_else(|| panic!("condition key {} lacks the {prefix} prefix", key.name));
    let method = format!("if_{}", ident(local));
    claim(used, &method, &key.name);

    let value_type = key.types[0].as_str();
    let parameterized = key.name.contains("${TagKey}");
    assert!(
        !parameterized || matches!(value_type, "String" | "Arn" | "Date"),
        "tag-parameterized condition key {} must be string-shaped",
        key.name
    );

    let key_expr = if parameterized {
        format!("format!({:?}, tag_key)", key.name.replace("${TagKey}", "{}"))
    } else {
        format!("{:?}", key.name)
    };
    let _ = writeln!(
        out,
        "        /// Filter by `{}`.",
        key.name.replace("${TagKey}", "<key>")
    );

    match value_type {
        "Bool" => {
            let _ = writeln!(
                out,
                "        pub fn {method}(mut self, value: impl Into<Option<bool>>) -> Self {{"
            );
            out.push_str("            self.statement.set_condition(\n");
            let _ = writeln!(out, "                {key_expr},");
            out.push_str("                value.into().unwrap_or(true),\n");
            out.push_str("                iam_fluent_core::Operator::Bool,\n");
        }
        "Numeric" => {
            let _ = writeln!(
                out,
                "        pub fn {method}(mut self, value: i64, operator: Option<iam_fluent_core::Operator>) -> Self {{"
            );
            out.push_str("            self.statement.set_condition(\n");
            let _ = writeln!(out, "                {key_expr},");
            out.push_str("                value,\n");
            out.push_str(
                "                operator.unwrap_or(iam_fluent_core::Operator::NumericEquals),\n",
            );
        }
        _ => {
            let tag_param = if parameterized { "tag_key: &str, " } else { "" };
            let _ = writeln!(
                out,
                "        pub fn {method}(mut self, {tag_param}value: &str, operator: Option<iam_fluent_core::Operator>) -> Self {{"
            );
            out.push_str("            self.statement.set_condition(\n");
            let _ = writeln!(out, "                {key_expr},");
            out.push_str("                value,\n");
            let _ = writeln!(
                out,
                "                operator.unwrap_or(iam_fluent_core::Operator::{}),",
                default_operator_variant(value_type)
            );
        }
    }
    out.push_str("            );\n");
    out.push_str("            self\n");
    out.push_str("        }\n\n");
}

fn claim(used: &mut BTreeSet<String>, method: &str, source: &str) {
    assert!(
        used.insert(method.to_string()),
        "{source} generates method {method}, which is already taken"
    );
}

/// Snake-case an authorization reference name into a method or parameter
/// identifier. Separator characters become word breaks and `${...}` tokens
/// are dropped before casing.
fn ident(raw: &str) -> String {
    let name = sanitized(raw).to_case(Case::Snake);
    assert!(
        !name.is_empty() && name.chars().next().is_some_and(char::is_alphabetic),
        "{raw} does not sanitize to a usable identifier"
    );
    assert!(
        !KEYWORDS.contains(&name.as_str()),
        "{raw} sanitizes to the reserved word {name}"
    );
    name
}

fn sanitized(raw: &str) -> String {
    strip_tokens(raw)
        .chars()
        .map(|c| if matches!(c, '/' | '-' | ':' | '.') { ' ' } else { c })
        .collect()
}

/// Remove `${...}` tokens from a name.
fn strip_tokens(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => rest = &rest[start + 2 + end + 1..],
            None => panic!("unterminated ${{...}} token in {raw}"),
        }
    }
    result.push_str(rest);
    result
}

/// Placeholder names in template order, de-duplicated.
fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .unwrap_or_else(|| panic!("unterminated placeholder in {template}"));
        let name = &after[..end];
        assert!(!name.is_empty(), "empty placeholder in {template}");
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    names
}

fn access_level_variant(properties: &Properties) -> &'static str {
    if properties.is_permission_management {
        "PermissionsManagement"
    } else if properties.is_tagging_only {
        "Tagging"
    } else if properties.is_write {
        "Write"
    } else if properties.is_list {
        "List"
    } else {
        "Read"
    }
}

fn access_level_label(properties: &Properties) -> &'static str {
    if properties.is_permission_management {
        "Permissions management"
    } else if properties.is_tagging_only {
        "Tagging"
    } else if properties.is_write {
        "Write"
    } else if properties.is_list {
        "List"
    } else {
        "Read"
    }
}

fn value_type_variant(value_type: &str) -> &'static str {
    match value_type {
        "String" => "String",
        "Arn" => "Arn",
        "Numeric" => "Numeric",
        "Bool" => "Bool",
        "Date" => "Date",
        other => panic!("unknown condition value type {other}"),
    }
}

fn default_operator_variant(value_type: &str) -> &'static str {
    match value_type {
        "String" => "StringLike",
        "Arn" => "ArnLike",
        "Date" => "DateEquals",
        other => panic!("no default operator mapping for {other}"),
    }
}

fn str_slice(items: &[String]) -> String {
    if items.is_empty() {
        return "&[]".to_string();
    }
    let quoted: Vec<String> = items.iter().map(|item| format!("{item:?}")).collect();
    format!("&[{}]", quoted.join(", "))
}
