//! Resolved schema tree.
//!
//! A [`SchemaNode`] tree is what the resolver produces after every `$ref`
//! has been spliced in. It holds no reference nodes and no back-pointers,
//! so both the validator and the synthesizer can walk it with plain
//! recursion.

use regex::Regex;
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Primitive types
// ============================================================================

/// JSON Schema `type` names understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl PrimitiveType {
    /// Parse a `type` keyword value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether `value` is an instance of this type.
    ///
    /// `integer` accepts any number without a fractional part, so `1.0`
    /// is an integer while `1.5` is not.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => is_integral(value),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Null => value.is_null(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64()
                || n.is_u64()
                || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Name the JSON kind of an instance for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) if is_integral(value) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Pattern
// ============================================================================

/// A compiled `pattern` constraint.
///
/// The expression is anchored on both ends so that a value must match it in
/// full. Equality compares the source text, which keeps resolved trees
/// comparable.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The expression as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Primitive constraints carried by a leaf node.
///
/// An empty `types` list accepts any JSON kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafConstraints {
    pub types: Vec<PrimitiveType>,
    pub enum_values: Option<Vec<Value>>,
    pub pattern: Option<Pattern>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub format: Option<String>,
}

impl LeafConstraints {
    /// First non-null type, used to decide what kind of value to produce.
    pub fn primary_type(&self) -> Option<PrimitiveType> {
        self.types
            .iter()
            .copied()
            .find(|t| *t != PrimitiveType::Null)
            .or_else(|| self.types.first().copied())
    }
}

/// Object node: declared properties plus the required name set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub properties: Vec<(String, SchemaNode)>,
    pub required: BTreeSet<String>,
}

impl ObjectNode {
    /// Get a declared property schema by name.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, node)| node)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

/// A node of a fully dereferenced schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object(ObjectNode),
    Array(Box<SchemaNode>),
    /// `oneOf` alternatives in declaration order.
    Union(Vec<SchemaNode>),
    Leaf(LeafConstraints),
}

impl SchemaNode {
    /// A leaf with no constraints, matching every instance.
    pub fn any() -> Self {
        SchemaNode::Leaf(LeafConstraints::default())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
            SchemaNode::Union(_) => "union",
            SchemaNode::Leaf(_) => "leaf",
        }
    }

    /// Discriminator value of a union branch.
    ///
    /// Returns the single enum member of the object's `type` property, if
    /// the node is an object declaring one.
    pub fn discriminator(&self) -> Option<&Value> {
        let SchemaNode::Object(object) = self else {
            return None;
        };
        match object.property("type") {
            Some(SchemaNode::Leaf(LeafConstraints {
                enum_values: Some(values),
                ..
            })) if values.len() == 1 => values.first(),
            _ => None,
        }
    }

    /// Render the resolved tree as an inlined JSON Schema document.
    ///
    /// The output contains no `$ref` and resolves back to an equal tree.
    pub fn to_json(&self) -> Value {
        match self {
            SchemaNode::Object(object) => {
                let mut out = Map::new();
                out.insert("type".to_string(), Value::from("object"));
                let properties: Map<String, Value> = object
                    .properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_json()))
                    .collect();
                out.insert("properties".to_string(), Value::Object(properties));
                if !object.required.is_empty() {
                    let required = object.required.iter().cloned().map(Value::from).collect();
                    out.insert("required".to_string(), Value::Array(required));
                }
                Value::Object(out)
            }
            SchemaNode::Array(items) => {
                let mut out = Map::new();
                out.insert("type".to_string(), Value::from("array"));
                out.insert("items".to_string(), items.to_json());
                Value::Object(out)
            }
            SchemaNode::Union(branches) => {
                let mut out = Map::new();
                let branches = branches.iter().map(SchemaNode::to_json).collect();
                out.insert("oneOf".to_string(), Value::Array(branches));
                Value::Object(out)
            }
            SchemaNode::Leaf(leaf) => leaf_to_json(leaf),
        }
    }
}

fn leaf_to_json(leaf: &LeafConstraints) -> Value {
    let mut out = Map::new();
    match leaf.types.as_slice() {
        [] => {}
        [single] => {
            out.insert("type".to_string(), Value::from(single.as_str()));
        }
        many => {
            let names = many.iter().map(|t| Value::from(t.as_str())).collect();
            out.insert("type".to_string(), Value::Array(names));
        }
    }
    if let Some(values) = &leaf.enum_values {
        out.insert("enum".to_string(), Value::Array(values.clone()));
    }
    if let Some(pattern) = &leaf.pattern {
        out.insert("pattern".to_string(), Value::from(pattern.as_str()));
    }
    if let Some(minimum) = leaf.minimum {
        out.insert("minimum".to_string(), number_value(minimum));
    }
    if let Some(maximum) = leaf.maximum {
        out.insert("maximum".to_string(), number_value(maximum));
    }
    if let Some(format) = &leaf.format {
        out.insert("format".to_string(), Value::from(format.as_str()));
    }
    Value::Object(out)
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
