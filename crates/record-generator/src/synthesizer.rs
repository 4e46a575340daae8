//! Record synthesis from a resolved schema tree.

use crate::error::{ProviderError, SynthesisError};
use crate::provider::{ValueProvider, ValueRequest};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use schema_core::{LeafConstraints, ObjectNode, SchemaNode};
use serde_json::{Map, Value};
use tracing::trace;

/// Knobs controlling optional properties and array sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisPolicy {
    /// Probability that a non-required property is included.
    pub optional_probability: f64,
    pub array_min_items: usize,
    pub array_max_items: usize,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            optional_probability: 1.0,
            array_min_items: 1,
            array_max_items: 3,
        }
    }
}

impl SynthesisPolicy {
    /// Check that the policy values are usable.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if !(0.0..=1.0).contains(&self.optional_probability) {
            return Err(SynthesisError::InvalidPolicy(format!(
                "optional probability must be between 0 and 1, got {}",
                self.optional_probability
            )));
        }
        if self.array_min_items > self.array_max_items {
            return Err(SynthesisError::InvalidPolicy(format!(
                "array min items ({}) is greater than array max items ({})",
                self.array_min_items, self.array_max_items
            )));
        }
        Ok(())
    }
}

/// Produces random JSON instances conforming to a [`SchemaNode`] tree.
///
/// Each synthesizer owns a seeded RNG, so two synthesizers built with the
/// same provider, policy and seed produce identical sequences.
pub struct RecordSynthesizer<P> {
    provider: P,
    policy: SynthesisPolicy,
    rng: StdRng,
    /// Number of records produced so far
    generated: u64,
}

impl<P: ValueProvider> RecordSynthesizer<P> {
    /// Create a synthesizer with the default policy.
    pub fn new(provider: P, seed: u64) -> Self {
        Self {
            provider,
            policy: SynthesisPolicy::default(),
            rng: StdRng::seed_from_u64(seed),
            generated: 0,
        }
    }

    /// Replace the synthesis policy, rejecting invalid values.
    pub fn with_policy(mut self, policy: SynthesisPolicy) -> Result<Self, SynthesisError> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    /// Number of records synthesized so far.
    pub fn generated_count(&self) -> u64 {
        self.generated
    }

    /// Synthesize one instance of `node`.
    pub fn synthesize(&mut self, node: &SchemaNode) -> Result<Value, SynthesisError> {
        let value = self.fill(node, None, "$")?;
        self.generated += 1;
        Ok(value)
    }

    /// Lazily synthesize `count` instances.
    pub fn records<'a>(&'a mut self, node: &'a SchemaNode, count: u64) -> RecordIterator<'a, P> {
        RecordIterator {
            synthesizer: self,
            node,
            remaining: count,
        }
    }

    fn fill(&mut self, node: &SchemaNode, field: Option<&str>, path: &str) -> Result<Value, SynthesisError> {
        match node {
            SchemaNode::Object(object) => self.fill_object(object, path),
            SchemaNode::Array(items) => {
                let (lo, hi) = (self.policy.array_min_items, self.policy.array_max_items);
                let count = self.rng.random_range(lo.min(hi)..=hi.max(lo));
                let mut elements = Vec::with_capacity(count);
                for index in 0..count {
                    elements.push(self.fill(items, field, &format!("{path}[{index}]"))?);
                }
                Ok(Value::Array(elements))
            }
            SchemaNode::Union(branches) => {
                if branches.is_empty() {
                    return Ok(Value::Null);
                }
                let index = self.rng.random_range(0..branches.len());
                trace!("{path}: chose oneOf branch {index}");
                self.fill(&branches[index], field, path)
            }
            SchemaNode::Leaf(leaf) => self.fill_leaf(leaf, field, path),
        }
    }

    fn fill_object(&mut self, object: &ObjectNode, path: &str) -> Result<Value, SynthesisError> {
        let mut fields = Map::new();

        for (name, property) in &object.properties {
            let include = object.is_required(name)
                || self.rng.random_bool(self.policy.optional_probability);
            if include {
                let value = self.fill(property, Some(name), &format!("{path}.{name}"))?;
                fields.insert(name.clone(), value);
            }
        }

        // Required names with no declared schema accept anything
        for name in &object.required {
            if !fields.contains_key(name) {
                let value = self.fill(&SchemaNode::any(), Some(name), &format!("{path}.{name}"))?;
                fields.insert(name.clone(), value);
            }
        }

        Ok(Value::Object(fields))
    }

    fn fill_leaf(&mut self, leaf: &LeafConstraints, field: Option<&str>, path: &str) -> Result<Value, SynthesisError> {
        if let Some(values) = &leaf.enum_values {
            return Ok(pick_enum_member(leaf, values, &mut self.rng));
        }

        let request = ValueRequest::new(field, leaf);
        self.provider
            .generate(&request, &mut self.rng)
            .map_err(|source: ProviderError| SynthesisError::Value {
                path: path.to_string(),
                source,
            })
    }
}

/// Pick an enum member, preferring non-null members that satisfy `type`.
fn pick_enum_member<R: Rng>(leaf: &LeafConstraints, values: &[Value], rng: &mut R) -> Value {
    let type_ok = |value: &Value| leaf.types.is_empty() || leaf.types.iter().any(|t| t.matches(value));

    let candidates: Vec<&Value> = values
        .iter()
        .filter(|value| !value.is_null() && type_ok(*value))
        .collect();

    match candidates.choose(rng) {
        Some(value) => (*value).clone(),
        None => values.iter().find(|value| type_ok(*value)).cloned().unwrap_or(Value::Null),
    }
}

/// Iterator that lazily synthesizes records.
pub struct RecordIterator<'a, P> {
    synthesizer: &'a mut RecordSynthesizer<P>,
    node: &'a SchemaNode,
    remaining: u64,
}

impl<P: ValueProvider> Iterator for RecordIterator<'_, P> {
    type Item = Result<Value, SynthesisError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.synthesizer.synthesize(self.node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}
