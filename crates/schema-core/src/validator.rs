//! Instance validation against a resolved schema tree.

use crate::node::{json_kind, LeafConstraints, ObjectNode, PrimitiveType, SchemaNode};
use serde_json::Value;
use std::fmt;

/// One validation failure, located inside the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Instance path such as `$.contactInfo.phoneNumber` or `$.tags[0]`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return f.write_str("valid");
        }
        for (i, issue) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Validate `instance` against `node`.
///
/// Sibling properties are all checked so every problem at a level is
/// reported. For unions the first fully matching branch wins and the other
/// branches' errors are dropped; when no branch matches, one error per
/// branch is reported.
pub fn validate(node: &SchemaNode, instance: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    check(node, instance, "$", &mut errors);
    ValidationResult::from_errors(errors)
}

fn check(node: &SchemaNode, instance: &Value, path: &str, errors: &mut Vec<ValidationIssue>) {
    match node {
        SchemaNode::Leaf(leaf) => check_leaf(leaf, instance, path, errors),
        SchemaNode::Object(object) => check_object(object, instance, path, errors),
        SchemaNode::Array(items) => {
            let Some(elements) = instance.as_array() else {
                errors.push(issue(path, format!("expected array, found {}", json_kind(instance))));
                return;
            };
            for (index, element) in elements.iter().enumerate() {
                check(items, element, &format!("{path}[{index}]"), errors);
            }
        }
        SchemaNode::Union(branches) => check_union(branches, instance, path, errors),
    }
}

fn check_object(object: &ObjectNode, instance: &Value, path: &str, errors: &mut Vec<ValidationIssue>) {
    let Some(fields) = instance.as_object() else {
        errors.push(issue(path, format!("expected object, found {}", json_kind(instance))));
        return;
    };

    for name in &object.required {
        if !fields.contains_key(name) {
            errors.push(issue(path, format!("missing required property '{name}'")));
        }
    }

    for (name, value) in fields {
        if let Some(property) = object.property(name) {
            check(property, value, &format!("{path}.{name}"), errors);
        }
    }
}

fn check_union(branches: &[SchemaNode], instance: &Value, path: &str, errors: &mut Vec<ValidationIssue>) {
    let mut failures = Vec::with_capacity(branches.len());

    for (index, branch) in branches.iter().enumerate() {
        let mut branch_errors = Vec::new();
        check(branch, instance, path, &mut branch_errors);
        if branch_errors.is_empty() {
            return;
        }
        failures.push((index, branch, branch_errors));
    }

    for (index, branch, branch_errors) in failures {
        let label = match branch.discriminator() {
            Some(discriminator) => format!("oneOf branch {index} ({discriminator})"),
            None => format!("oneOf branch {index}"),
        };
        let summary = branch_errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        errors.push(issue(path, format!("{label} did not match: {summary}")));
    }
}

fn check_leaf(leaf: &LeafConstraints, instance: &Value, path: &str, errors: &mut Vec<ValidationIssue>) {
    if !leaf.types.is_empty() && !leaf.types.iter().any(|t| t.matches(instance)) {
        errors.push(issue(
            path,
            format!("expected {}, found {}", describe_types(&leaf.types), json_kind(instance)),
        ));
        return;
    }

    if let Some(values) = &leaf.enum_values {
        if !values.contains(instance) {
            errors.push(issue(
                path,
                format!("{instance} is not one of {}", Value::Array(values.clone())),
            ));
        }
    }

    if let (Some(pattern), Some(text)) = (&leaf.pattern, instance.as_str()) {
        if !pattern.is_match(text) {
            errors.push(issue(
                path,
                format!("{instance} does not match pattern \"{}\"", pattern.as_str()),
            ));
        }
    }

    if let Some(number) = instance.as_f64() {
        if let Some(minimum) = leaf.minimum {
            if number < minimum {
                errors.push(issue(path, format!("{instance} is less than the minimum of {minimum}")));
            }
        }
        if let Some(maximum) = leaf.maximum {
            if number > maximum {
                errors.push(issue(path, format!("{instance} is greater than the maximum of {maximum}")));
            }
        }
    }
}

fn describe_types(types: &[PrimitiveType]) -> String {
    types
        .iter()
        .map(PrimitiveType::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}

fn issue(path: &str, message: String) -> ValidationIssue {
    ValidationIssue {
        path: path.to_string(),
        message,
    }
}
