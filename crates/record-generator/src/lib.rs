//! Synthetic record generation driven by resolved JSON schemas.
//!
//! The [`RecordSynthesizer`] walks a [`schema_core::SchemaNode`] tree and
//! produces JSON instances that validate against it. Structure (objects,
//! arrays, `oneOf` branches, optional properties) is decided by the
//! synthesizer; leaf values come from a pluggable [`ValueProvider`].
//!
//! # Architecture
//!
//! ```text
//! SchemaNode (resolved)
//!        │
//!        ▼
//! ┌──────────────────────┐      ┌─────────────────────┐
//! │  RecordSynthesizer   │─────▶│   ValueProvider     │
//! │                      │ leaf │                     │
//! │  - policy            │      │  LocaleValueProvider│
//! │  - rng (StdRng)      │      │  - pattern          │
//! │  - generated count   │      │  - locale pools     │
//! └──────────┬───────────┘      │  - numeric / dates  │
//!            │                  └─────────────────────┘
//!            ▼
//!     serde_json::Value
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use record_generator::{LocaleValueProvider, RecordSynthesizer};
//! use schema_core::SchemaResolver;
//!
//! let schema = SchemaResolver::default()
//!     .resolve_file("schemas/schema.json")
//!     .unwrap();
//!
//! let provider = LocaleValueProvider::from_tag(Some("fr_FR"));
//! let mut synthesizer = RecordSynthesizer::new(provider, 42);
//! let record = synthesizer.synthesize(&schema).unwrap();
//! println!("{record}");
//! ```
//!
//! # Value selection
//!
//! - `enum` picks a member, preferring non-null ones
//! - `pattern` generates from a supported regex subset
//! - `integer`/`number` respect `minimum` and `maximum`
//! - `format` (`date`, `date-time`, `email`, `uuid`) and the property name
//!   pick realistic strings such as names, emails and addresses

pub mod error;
pub mod generators;
pub mod provider;
pub mod synthesizer;

// Re-exports for convenience
pub use error::{ProviderError, SynthesisError};
pub use generators::locale::Locale;
pub use provider::{LocaleValueProvider, SemanticType, ValueProvider, ValueRequest};
pub use synthesizer::{RecordIterator, RecordSynthesizer, SynthesisPolicy};
