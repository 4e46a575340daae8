//! Registry connection settings.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings, usually loaded from a JSON file:
///
/// ```json
/// {
///   "url": "https://psrc-xxxx.us-east-2.aws.confluent.cloud",
///   "api_key": "KEY",
///   "api_secret": "SECRET"
/// }
/// ```
///
/// Without `api_key` requests are sent unauthenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl RegistryConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            api_secret: None,
        }
    }

    /// Load settings from a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| RegistryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(
            &path,
            r#"{"url": "http://localhost:8081", "api_key": "k", "api_secret": "s"}"#,
        )
        .unwrap();

        let config = RegistryConfig::from_file(&path).unwrap();
        assert_eq!(config.url, "http://localhost:8081");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.api_secret.as_deref(), Some("s"));
    }

    #[test]
    fn test_credentials_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, r#"{"url": "http://localhost:8081"}"#).unwrap();

        assert_eq!(
            RegistryConfig::from_file(&path).unwrap(),
            RegistryConfig::new("http://localhost:8081")
        );
    }

    #[test]
    fn test_missing_url_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, r#"{"api_key": "k"}"#).unwrap();

        assert!(matches!(
            RegistryConfig::from_file(&path),
            Err(RegistryError::ConfigParse { .. })
        ));
    }
}
