//! Output sinks for schema-eventgen.
//!
//! A sink is chosen by name from a [`SinkRegistry`], opened once per run and
//! closed once at the end:
//!
//! ```text
//! SinkRegistry::create("file", &config)
//!        │
//!        ▼
//!  Box<dyn OutputSink> ──open()──▶ Box<dyn SinkHandle>
//!                                     │ deliver(&record) × N
//!                                     ▼
//!                                  close()
//! ```
//!
//! Built-in sinks:
//!
//! - `console` - pretty JSON on stdout, each record followed by a separator
//! - `file` - JSON Lines, truncating or appending
//! - `kafka` - one JSON message per record via an rdkafka `FutureProducer`

pub mod config;
pub mod console;
pub mod error;
pub mod file;
pub mod kafka;
pub mod registry;
mod traits;

pub use config::{KafkaSinkConfig, SinkConfig};
pub use console::ConsoleSink;
pub use error::{DeliveryError, SinkError};
pub use file::FileSink;
pub use kafka::KafkaSink;
pub use registry::{SinkConstructor, SinkRegistry};
pub use traits::{OutputSink, SinkHandle};
