//! Schema loading, `$ref` resolution and validation for schema-eventgen.
//!
//! This crate turns a set of JSON (or YAML) schema files that reference each
//! other by relative filename into one dereferenced [`SchemaNode`] tree, and
//! validates instances against that tree.
//!
//! # Architecture
//!
//! ```text
//! schema.json ──$ref──▶ phone-contact.schema.json
//!      │
//!      ▼
//! ┌─────────────────┐      ┌──────────────────┐
//! │   SchemaStore   │◀─────│  SchemaResolver  │
//! │                 │ load │                  │
//! │ - cache by      │      │ - depth-first    │
//! │   canonical     │      │ - in-progress    │
//! │   location      │      │   set (cycles)   │
//! └─────────────────┘      └────────┬─────────┘
//!                                   │
//!                                   ▼
//!                     SchemaNode { Object | Array | Union | Leaf }
//!                                   │
//!                                   ▼
//!                          validate(node, instance)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use schema_core::{validate, SchemaResolver};
//! use serde_json::json;
//!
//! let mut resolver = SchemaResolver::default();
//! let schema = resolver.resolve_file("schemas/schema.json").unwrap();
//!
//! let record = json!({
//!     "id": "1",
//!     "name": "A",
//!     "contactInfo": {"type": "phone", "phoneNumber": "1234567890", "countryCode": "1"}
//! });
//! assert!(validate(&schema, &record).valid);
//! ```
//!
//! # Supported keywords
//!
//! `type`, `required`, `properties`, `enum`, `pattern`, `minimum`,
//! `maximum`, `oneOf`, `$ref`, `items` and `format` (advisory). Unknown
//! keywords are ignored and unknown properties are allowed.

pub mod error;
pub mod node;
pub mod resolver;
pub mod store;
pub mod validator;

// Re-exports for convenience
pub use error::SchemaError;
pub use node::{LeafConstraints, ObjectNode, Pattern, PrimitiveType, SchemaNode};
pub use resolver::SchemaResolver;
pub use store::{ReferenceTarget, SchemaDocument, SchemaStore};
pub use validator::{validate, ValidationIssue, ValidationResult};
