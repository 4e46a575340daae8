//! Leaf value providers.
//!
//! The synthesizer walks the schema tree and asks a [`ValueProvider`] for
//! every leaf. The provider is told what kind of value is wanted (a
//! [`SemanticType`] inferred from the property name and the leaf's
//! constraints) and returns a JSON value.

use crate::error::ProviderError;
use crate::generators::locale::{self, Locale};
use crate::generators::{numeric, pattern, timestamp, uuid};
use rand::Rng;
use schema_core::{LeafConstraints, PrimitiveType};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// What kind of value a leaf should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Any string satisfying the leaf's `pattern`.
    PatternString,
    PersonName,
    Email,
    Phone,
    /// International calling code such as `+33`.
    CountryCode,
    StreetAddress,
    City,
    State,
    PostalCode,
    Country,
    Identifier,
    Uuid,
    Date,
    DateTime,
    Tag,
    Department,
    FreeText,
    Integer,
    Number,
    Boolean,
    Null,
    EmptyObject,
    EmptyArray,
}

impl SemanticType {
    /// Infer the semantic type for a leaf.
    ///
    /// Structural constraints win over naming: a leaf with a `pattern` is
    /// always generated from the pattern, and a non-string type always gets
    /// a value of that type. Only then are `format` and the property name
    /// consulted.
    pub fn infer(field: Option<&str>, leaf: &LeafConstraints) -> Self {
        match leaf.primary_type() {
            Some(PrimitiveType::Integer) => return SemanticType::Integer,
            Some(PrimitiveType::Number) => return SemanticType::Number,
            Some(PrimitiveType::Boolean) => return SemanticType::Boolean,
            Some(PrimitiveType::Null) => return SemanticType::Null,
            Some(PrimitiveType::Object) => return SemanticType::EmptyObject,
            Some(PrimitiveType::Array) => return SemanticType::EmptyArray,
            Some(PrimitiveType::String) | None => {}
        }

        if leaf.pattern.is_some() {
            return SemanticType::PatternString;
        }

        match leaf.format.as_deref() {
            Some("date") => return SemanticType::Date,
            Some("date-time") => return SemanticType::DateTime,
            Some("email") => return SemanticType::Email,
            Some("uuid") => return SemanticType::Uuid,
            _ => {}
        }

        field.map(Self::from_field_name).unwrap_or(SemanticType::FreeText)
    }

    fn from_field_name(field: &str) -> Self {
        let name: String = field
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match name.as_str() {
            n if n.contains("email") => SemanticType::Email,
            n if n.contains("countrycode") || n.contains("callingcode") => {
                SemanticType::CountryCode
            }
            n if n.contains("phone") => SemanticType::Phone,
            n if n.contains("street") => SemanticType::StreetAddress,
            n if n.contains("city") => SemanticType::City,
            n if n == "state" || n.contains("province") || n.contains("region") => {
                SemanticType::State
            }
            n if n.contains("postal") || n.contains("zip") || n.contains("postcode") => {
                SemanticType::PostalCode
            }
            n if n.contains("country") => SemanticType::Country,
            n if n.contains("uuid") => SemanticType::Uuid,
            n if n.contains("department") => SemanticType::Department,
            n if n.contains("tag") => SemanticType::Tag,
            n if n.contains("timestamp") || n.contains("updated") || n.ends_with("at") => {
                SemanticType::DateTime
            }
            n if n.contains("date") || n.contains("start") || n.contains("end") => {
                SemanticType::Date
            }
            n if n == "id" || n.ends_with("id") => SemanticType::Identifier,
            n if n.contains("name") => SemanticType::PersonName,
            _ => SemanticType::FreeText,
        }
    }
}

/// One leaf value request.
#[derive(Debug, Clone, Copy)]
pub struct ValueRequest<'a> {
    pub semantic: SemanticType,
    /// Name of the property (or array property) being filled, if any.
    pub field: Option<&'a str>,
    pub leaf: &'a LeafConstraints,
}

impl<'a> ValueRequest<'a> {
    pub fn new(field: Option<&'a str>, leaf: &'a LeafConstraints) -> Self {
        Self {
            semantic: SemanticType::infer(field, leaf),
            field,
            leaf,
        }
    }
}

/// Produces primitive values for schema leaves.
///
/// Implementations must only draw randomness from `rng` so that a seeded
/// synthesizer stays reproducible.
pub trait ValueProvider {
    fn generate<R: Rng>(&self, request: &ValueRequest<'_>, rng: &mut R) -> Result<Value, ProviderError>;
}

/// Default provider backed by bundled locale pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleValueProvider {
    locale: Locale,
}

impl LocaleValueProvider {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Build a provider from an optional locale tag.
    ///
    /// Unknown tags fall back to `en_US` with a warning.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let locale = match tag {
            None => Locale::default(),
            Some(tag) => Locale::from_tag(tag).unwrap_or_else(|| {
                warn!(
                    "Unknown locale '{tag}', falling back to {}",
                    Locale::default()
                );
                Locale::default()
            }),
        };
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl ValueProvider for LocaleValueProvider {
    fn generate<R: Rng>(&self, request: &ValueRequest<'_>, rng: &mut R) -> Result<Value, ProviderError> {
        let pools = self.locale.pools();
        let leaf = request.leaf;

        let value = match request.semantic {
            SemanticType::PatternString => {
                let Some(constraint) = &leaf.pattern else {
                    return Ok(Value::from(locale::words(rng)));
                };
                let text = pattern::generate_from_pattern(constraint.as_str(), rng)?;
                // The generator's subset must agree with the real regex engine
                if !constraint.is_match(&text) {
                    return Err(ProviderError::UnsupportedPattern {
                        pattern: constraint.as_str().to_string(),
                        reason: format!("generated {text:?} does not match"),
                    });
                }
                Value::from(text)
            }
            SemanticType::PersonName => Value::from(pools.person_name(rng)),
            SemanticType::Email => Value::from(pools.email(rng)),
            SemanticType::Phone => Value::from(pools.phone_number(rng)),
            SemanticType::CountryCode => Value::from(pools.calling_code()),
            SemanticType::StreetAddress => Value::from(pools.street_address(rng)),
            SemanticType::City => Value::from(pools.city(rng)),
            SemanticType::State => Value::from(pools.state(rng)),
            SemanticType::PostalCode => Value::from(pools.postal_code(rng)),
            SemanticType::Country => Value::from(pools.country()),
            SemanticType::Identifier => Value::from(format!("p{}", rng.random_range(1000..10000))),
            SemanticType::Uuid => Value::from(uuid::generate_uuid_v4(rng).to_string()),
            SemanticType::Date => Value::from(timestamp::generate_date(rng)),
            SemanticType::DateTime => Value::from(timestamp::generate_date_time(rng)),
            SemanticType::Tag => Value::from(locale::tag(rng)),
            SemanticType::Department => Value::from(locale::department(rng)),
            SemanticType::FreeText => Value::from(locale::words(rng)),
            SemanticType::Integer => Value::from(numeric::generate_int_range(
                rng,
                leaf.minimum,
                leaf.maximum,
            )?),
            SemanticType::Number => {
                let n = numeric::generate_float_range(rng, leaf.minimum, leaf.maximum)?;
                Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
            }
            SemanticType::Boolean => Value::Bool(rng.random_bool(0.5)),
            SemanticType::Null => Value::Null,
            SemanticType::EmptyObject => Value::Object(Map::new()),
            SemanticType::EmptyArray => Value::Array(Vec::new()),
        };

        Ok(value)
    }
}
