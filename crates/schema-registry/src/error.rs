//! Error types for Schema Registry access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors talking to a Schema Registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry config {path:?}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid registry config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid Schema Registry URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid schema version '{0}': expected 'latest' or a positive number")]
    InvalidVersion(String),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Schema Registry returned {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Unexpected response from {url}: {source}")]
    Response {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
