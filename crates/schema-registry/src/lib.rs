//! Confluent Schema Registry client.
//!
//! Registers JSON Schemas after their references have been inlined, since
//! the registry cannot follow file-relative `$ref`s.
//!
//! ```text
//!  schemas/schema.json ──▶ SchemaResolver ──▶ SchemaNode::to_json()
//!                                                   │
//!                                                   ▼
//!                            POST /subjects/{subject}/versions
//!                            POST /compatibility/subjects/{subject}/versions/{v}
//!                            GET  /subjects, /subjects/{subject}/versions/{v}
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{RegisteredSchema, SchemaRegistryClient, SchemaVersion, SubjectSchema};
pub use config::RegistryConfig;
pub use error::RegistryError;
