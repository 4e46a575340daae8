//! schema-eventgen
//!
//! Validate records against modular JSON Schemas and generate
//! schema-conformant events at a controlled rate.
//!
//! ```text
//!  schemas/*.json ──▶ SchemaStore ──▶ SchemaResolver ──▶ SchemaNode
//!                                                          │
//!                          ┌───────────────────────────────┤
//!                          ▼                               ▼
//!                      validate                    RecordSynthesizer
//!                   (validate cmd)                         │
//!                                            RateScheduler │ (generate cmd)
//!                                                          ▼
//!                                     SinkRegistry ──▶ console | file | kafka
//!
//!  SchemaNode::to_json() ──▶ SchemaRegistryClient (registry cmd)
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # 100 events at 10/s to the console
//! eventgen generate --count 100 --rate 10
//!
//! # As fast as possible into a JSON Lines file, French locale
//! eventgen generate --count 10000 --rate unlimited --output file \
//!   --output-path events.jsonl --locale fr_FR
//!
//! # Publish to Kafka using a config file
//! eventgen generate --output kafka --kafka-config kafka-config.json
//!
//! # Validate a data file (JSON or JSON Lines)
//! eventgen validate schema.json data/sample-data.json
//!
//! # Print the schema with all references inlined
//! eventgen resolve schema.json
//!
//! # Register the resolved schema with a Schema Registry
//! eventgen registry register --config registry-config.json --subject person-value
//! ```

pub mod commands;
pub mod config;

pub use commands::generate::{run_generate, GenerateArgs, OnDeliveryError};
pub use commands::registry::{run_registry, RegistryArgs, RegistryCommand};
pub use commands::resolve::{resolve_document, run_resolve, ResolveArgs};
pub use commands::validate::{load_json_file, run_validate, validate_data, ValidateArgs, ValidationSummary};
pub use commands::{load_schema, schema_location};
pub use config::{parse_rate, KafkaArgs};
