//! Error types for output sinks.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while choosing or configuring a sink, before any record
/// is delivered.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Unknown output type '{name}' (available: {})", .available.join(", "))]
    UnknownSink { name: String, available: Vec<String> },

    #[error("Invalid {sink} sink configuration: {message}")]
    Config { sink: String, message: String },

    #[error("Failed to read Kafka config {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Kafka config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while opening a sink, delivering a record or closing it.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),
}
