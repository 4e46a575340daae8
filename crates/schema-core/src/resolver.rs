//! `$ref` dereferencing into a single [`SchemaNode`] tree.

use crate::error::SchemaError;
use crate::node::{LeafConstraints, ObjectNode, Pattern, PrimitiveType, SchemaNode};
use crate::store::{ReferenceTarget, SchemaDocument, SchemaStore};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Keywords that carry no constraint and may sit next to `oneOf` silently.
const ANNOTATION_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$comment",
    "title",
    "description",
    "examples",
    "default",
    "definitions",
    "$defs",
    "oneOf",
];

/// Walks schema documents depth-first and splices every `$ref` target in
/// place.
///
/// The resolver owns the [`SchemaStore`] so referenced documents are loaded
/// once per resolver, however many times they are referenced.
#[derive(Debug, Default)]
pub struct SchemaResolver {
    store: SchemaStore,
}

impl SchemaResolver {
    pub fn new(store: SchemaStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// Load a schema file and resolve it.
    pub fn resolve_file(&mut self, location: impl AsRef<Path>) -> Result<SchemaNode, SchemaError> {
        let document = self.store.load(location)?;
        self.resolve(&document)
    }

    /// Resolve a loaded document into a reference-free tree.
    ///
    /// Fails with [`SchemaError::CyclicReference`] when a reference leads
    /// back to a target that is still being resolved on the current path.
    pub fn resolve(&mut self, document: &Arc<SchemaDocument>) -> Result<SchemaNode, SchemaError> {
        let mut in_progress = Vec::new();
        self.resolve_target(Arc::clone(document), String::new(), &mut in_progress)
    }

    fn resolve_target(
        &mut self,
        document: Arc<SchemaDocument>,
        pointer: String,
        in_progress: &mut Vec<ReferenceTarget>,
    ) -> Result<SchemaNode, SchemaError> {
        let key = ReferenceTarget {
            location: document.location().to_path_buf(),
            pointer,
        };

        if let Some(start) = in_progress.iter().position(|entry| *entry == key) {
            let mut chain: Vec<String> = in_progress[start..].iter().map(ToString::to_string).collect();
            chain.push(key.to_string());
            return Err(SchemaError::CyclicReference { chain });
        }

        let value = document
            .pointer(&key.pointer)
            .ok_or_else(|| SchemaError::DanglingPointer {
                location: key.location.clone(),
                pointer: key.pointer.clone(),
            })?
            .clone();

        let pointer = key.pointer.clone();
        in_progress.push(key);
        let resolved = self.resolve_value(&document, &value, &pointer, in_progress);
        in_progress.pop();
        resolved
    }

    fn resolve_value(
        &mut self,
        document: &Arc<SchemaDocument>,
        value: &Value,
        pointer: &str,
        in_progress: &mut Vec<ReferenceTarget>,
    ) -> Result<SchemaNode, SchemaError> {
        let invalid = |message: String| SchemaError::Invalid {
            location: document.location().to_path_buf(),
            pointer: pointer.to_string(),
            message,
        };

        let schema = match value {
            Value::Object(schema) => schema,
            Value::Bool(true) => return Ok(SchemaNode::any()),
            Value::Bool(false) => return Err(invalid("the `false` schema is not supported".into())),
            other => return Err(invalid(format!("expected a schema object, found {other}"))),
        };

        if let Some(reference) = schema.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| invalid("$ref must be a string".into()))?;
            let target = self.store.resolve_reference(document, reference)?;
            debug!("Resolving $ref '{}' -> {}", reference, target);
            let target_document = self
                .store
                .load(&target.location)
                .map_err(|err| err.referenced_from(document.location()))?;
            return self.resolve_target(target_document, target.pointer, in_progress);
        }

        if let Some(branches) = schema.get("oneOf") {
            let branches = branches
                .as_array()
                .filter(|branches| !branches.is_empty())
                .ok_or_else(|| invalid("oneOf must be a non-empty array".into()))?;

            let ignored: Vec<&str> = schema
                .keys()
                .map(String::as_str)
                .filter(|key| !ANNOTATION_KEYWORDS.contains(key))
                .collect();
            if !ignored.is_empty() {
                debug!(
                    "Ignoring keywords {:?} next to oneOf at {}#{}",
                    ignored,
                    document.location().display(),
                    pointer
                );
            }

            let resolved = branches
                .iter()
                .enumerate()
                .map(|(index, branch)| {
                    let branch_pointer = format!("{pointer}/oneOf/{index}");
                    self.resolve_value(document, branch, &branch_pointer, in_progress)
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(SchemaNode::Union(resolved));
        }

        let types = parse_types(schema).map_err(invalid)?;
        let single_type = match types.as_slice() {
            [single] => Some(*single),
            _ => None,
        };

        if single_type == Some(PrimitiveType::Object)
            || schema.contains_key("properties")
            || schema.contains_key("required")
        {
            return self.resolve_object(document, schema, pointer, in_progress);
        }

        if single_type == Some(PrimitiveType::Array) || schema.contains_key("items") {
            let items = match schema.get("items") {
                None => SchemaNode::any(),
                Some(Value::Array(_)) => {
                    return Err(invalid("tuple-form items are not supported".into()))
                }
                Some(items) => {
                    let items_pointer = format!("{pointer}/items");
                    self.resolve_value(document, items, &items_pointer, in_progress)?
                }
            };
            return Ok(SchemaNode::Array(Box::new(items)));
        }

        parse_leaf(schema, types).map(SchemaNode::Leaf).map_err(invalid)
    }

    fn resolve_object(
        &mut self,
        document: &Arc<SchemaDocument>,
        schema: &Map<String, Value>,
        pointer: &str,
        in_progress: &mut Vec<ReferenceTarget>,
    ) -> Result<SchemaNode, SchemaError> {
        let invalid = |message: &str| SchemaError::Invalid {
            location: document.location().to_path_buf(),
            pointer: pointer.to_string(),
            message: message.to_string(),
        };

        let mut properties = Vec::new();
        if let Some(declared) = schema.get("properties") {
            let declared = declared
                .as_object()
                .ok_or_else(|| invalid("properties must be an object"))?;
            for (name, property) in declared {
                let property_pointer = format!("{pointer}/properties/{}", escape_pointer(name));
                let node = self.resolve_value(document, property, &property_pointer, in_progress)?;
                properties.push((name.clone(), node));
            }
        }

        let mut required = BTreeSet::new();
        if let Some(names) = schema.get("required") {
            let names = names
                .as_array()
                .ok_or_else(|| invalid("required must be an array of strings"))?;
            for name in names {
                let name = name
                    .as_str()
                    .ok_or_else(|| invalid("required must be an array of strings"))?;
                required.insert(name.to_string());
            }
        }

        Ok(SchemaNode::Object(ObjectNode {
            properties,
            required,
        }))
    }
}

fn parse_types(schema: &Map<String, Value>) -> Result<Vec<PrimitiveType>, String> {
    let parse_one = |value: &Value| {
        value
            .as_str()
            .and_then(PrimitiveType::from_name)
            .ok_or_else(|| format!("unknown type {value}"))
    };

    match schema.get("type") {
        None => Ok(Vec::new()),
        Some(Value::Array(names)) => names.iter().map(parse_one).collect(),
        Some(name) => parse_one(name).map(|t| vec![t]),
    }
}

fn parse_leaf(schema: &Map<String, Value>, types: Vec<PrimitiveType>) -> Result<LeafConstraints, String> {
    let enum_values = match schema.get("enum") {
        None => None,
        Some(Value::Array(values)) if !values.is_empty() => Some(values.clone()),
        Some(_) => return Err("enum must be a non-empty array".to_string()),
    };

    let pattern = match schema.get("pattern") {
        None => None,
        Some(Value::String(source)) => {
            Some(Pattern::new(source).map_err(|e| format!("invalid pattern '{source}': {e}"))?)
        }
        Some(_) => return Err("pattern must be a string".to_string()),
    };

    let bound = |keyword: &str| match schema.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{keyword} must be a number")),
    };

    let format = match schema.get("format") {
        None => None,
        Some(Value::String(format)) => Some(format.clone()),
        Some(_) => return Err("format must be a string".to_string()),
    };

    Ok(LeafConstraints {
        types,
        enum_values,
        pattern,
        minimum: bound("minimum")?,
        maximum: bound("maximum")?,
        format,
    })
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
