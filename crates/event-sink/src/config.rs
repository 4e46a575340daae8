//! Sink configuration.

use crate::error::SinkError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "localhost:9092";
pub const DEFAULT_TOPIC: &str = "events";
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Settings handed to a sink constructor.
///
/// Each sink reads only the part it needs; the rest is ignored.
#[derive(Debug, Clone, Default)]
pub struct SinkConfig {
    /// Target file for the `file` sink.
    pub output_path: Option<PathBuf>,
    /// Append to `output_path` instead of truncating it.
    pub append: bool,
    pub kafka: KafkaSinkConfig,
}

/// Kafka sink settings.
///
/// When loaded from a JSON file, the keys `bootstrap_servers`, `topic` and
/// `key_field` are read directly and every other top-level key becomes an
/// extra producer property:
///
/// ```json
/// {
///   "bootstrap_servers": "broker-1:9092,broker-2:9092",
///   "topic": "person-events",
///   "key_field": "id",
///   "acks": "all",
///   "linger_ms": 10
/// }
/// ```
///
/// Underscored property names (`linger_ms`) are mapped to librdkafka's
/// dotted names (`linger.ms`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KafkaSinkConfig {
    #[serde(default = "default_bootstrap_servers")]
    pub bootstrap_servers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Record field whose value becomes the message key.
    #[serde(default = "default_key_field")]
    pub key_field: Option<String>,
    #[serde(flatten)]
    pub producer: BTreeMap<String, Value>,
}

fn default_bootstrap_servers() -> String {
    DEFAULT_BOOTSTRAP_SERVERS.to_string()
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

fn default_key_field() -> Option<String> {
    Some(DEFAULT_KEY_FIELD.to_string())
}

impl Default for KafkaSinkConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: default_bootstrap_servers(),
            topic: default_topic(),
            key_field: default_key_field(),
            producer: BTreeMap::new(),
        }
    }
}

impl KafkaSinkConfig {
    /// Load settings from a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SinkError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SinkError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Extra producer properties as librdkafka `(name, value)` pairs.
    pub fn producer_properties(&self) -> Vec<(String, String)> {
        self.producer
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.replace('_', "."), value)
            })
            .collect()
    }
}
