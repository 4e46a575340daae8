//! Schema Registry REST client.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Schema type sent with every registration.
const SCHEMA_TYPE_JSON: &str = "JSON";

/// A subject version selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    #[default]
    Latest,
    Number(u32),
}

impl FromStr for SchemaVersion {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(SchemaVersion::Latest);
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(SchemaVersion::Number(n)),
            _ => Err(RegistryError::InvalidVersion(s.to_string())),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Latest => f.write_str("latest"),
            SchemaVersion::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Response to a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredSchema {
    pub id: u64,
}

/// One registered schema version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSchema {
    pub subject: String,
    pub version: u32,
    pub id: u64,
    /// Absent for Avro, the registry default.
    #[serde(default)]
    pub schema_type: Option<String>,
    /// The schema document as a JSON string.
    pub schema: String,
}

impl SubjectSchema {
    /// Parse the embedded schema document.
    pub fn document(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.schema)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaPayload {
    schema_type: &'static str,
    schema: String,
}

impl SchemaPayload {
    fn json(schema: &Value) -> Self {
        Self {
            schema_type: SCHEMA_TYPE_JSON,
            schema: schema.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CompatibilityResponse {
    #[serde(default)]
    is_compatible: bool,
}

/// Client for the Confluent Schema Registry REST API.
///
/// # Example
///
/// ```ignore
/// let config = RegistryConfig::from_file("registry-config.json")?;
/// let client = SchemaRegistryClient::connect(&config).await?;
/// let registered = client.register("person-value", &schema.to_json()).await?;
/// println!("Schema registered with ID: {}", registered.id);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRegistryClient {
    http: reqwest::Client,
    base: Url,
    credentials: Option<(String, Option<String>)>,
}

impl SchemaRegistryClient {
    /// Build a client without contacting the registry.
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let invalid = |message: String| RegistryError::InvalidUrl {
            url: config.url.clone(),
            message,
        };
        let base = Url::parse(config.url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let credentials = config
            .api_key
            .clone()
            .map(|key| (key, config.api_secret.clone()));

        Ok(Self {
            http,
            base,
            credentials,
        })
    }

    /// Build a client and check the registry answers.
    pub async fn connect(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = Self::new(config)?;
        client.subjects().await?;
        info!("Successfully connected to Schema Registry at {}", client.base);
        Ok(client)
    }

    /// Registered subject names.
    pub async fn subjects(&self) -> Result<Vec<String>, RegistryError> {
        let url = self.endpoint(&["subjects"]);
        self.send(self.request(Method::GET, url.clone()), &url).await
    }

    /// Version numbers registered under `subject`.
    pub async fn versions(&self, subject: &str) -> Result<Vec<u32>, RegistryError> {
        let url = self.endpoint(&["subjects", subject, "versions"]);
        self.send(self.request(Method::GET, url.clone()), &url).await
    }

    /// Fetch one version of `subject`.
    pub async fn schema(&self, subject: &str, version: SchemaVersion) -> Result<SubjectSchema, RegistryError> {
        let version = version.to_string();
        let url = self.endpoint(&["subjects", subject, "versions", &version]);
        self.send(self.request(Method::GET, url.clone()), &url).await
    }

    /// Register `schema` as a new JSON Schema version of `subject`.
    pub async fn register(&self, subject: &str, schema: &Value) -> Result<RegisteredSchema, RegistryError> {
        let url = self.endpoint(&["subjects", subject, "versions"]);
        let request = self
            .request(Method::POST, url.clone())
            .json(&SchemaPayload::json(schema));

        let registered: RegisteredSchema = self.send(request, &url).await.inspect_err(|err| {
            if let RegistryError::Status { status: 422, .. } = err {
                error!("Registry rejected the schema as invalid or incompatible");
            }
        })?;
        info!("Successfully registered schema for subject '{subject}' with ID {}", registered.id);
        Ok(registered)
    }

    /// Whether `schema` is compatible with `version` of `subject`.
    pub async fn check_compatibility(
        &self,
        subject: &str,
        schema: &Value,
        version: SchemaVersion,
    ) -> Result<bool, RegistryError> {
        let version = version.to_string();
        let url = self.endpoint(&["compatibility", "subjects", subject, "versions", &version]);
        let request = self
            .request(Method::POST, url.clone())
            .json(&SchemaPayload::json(schema));

        let response: CompatibilityResponse = self.send(request, &url).await?;
        Ok(response.is_compatible)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);
        match &self.credentials {
            Some((key, secret)) => request.basic_auth(key, secret.as_ref()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T, RegistryError> {
        debug!("Schema Registry request: {url}");
        let request_error = |source| RegistryError::Request {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(RegistryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| RegistryError::Response {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_parsing() {
        assert_eq!("latest".parse::<SchemaVersion>().unwrap(), SchemaVersion::Latest);
        assert_eq!("3".parse::<SchemaVersion>().unwrap(), SchemaVersion::Number(3));
        assert!("0".parse::<SchemaVersion>().is_err());
        assert!("v2".parse::<SchemaVersion>().is_err());
        assert_eq!(SchemaVersion::Number(7).to_string(), "7");
        assert_eq!(SchemaVersion::default().to_string(), "latest");
    }

    #[test]
    fn test_endpoint_encodes_subject() {
        let client = SchemaRegistryClient::new(&RegistryConfig::new("http://registry:8081/base/")).unwrap();

        let url = client.endpoint(&["subjects", "person value", "versions"]);
        assert_eq!(url.as_str(), "http://registry:8081/base/subjects/person%20value/versions");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            SchemaRegistryClient::new(&RegistryConfig::new("not a url")),
            Err(RegistryError::InvalidUrl { .. })
        ));
        assert!(matches!(
            SchemaRegistryClient::new(&RegistryConfig::new("mailto:someone@example.com")),
            Err(RegistryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_payload_embeds_schema_as_string() {
        let payload = SchemaPayload::json(&serde_json::json!({"type": "object"}));
        let rendered = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!({"schemaType": "JSON", "schema": "{\"type\":\"object\"}"})
        );
    }
}
