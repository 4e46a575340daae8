//! Client against an in-process registry.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use schema_registry::{RegistryConfig, RegistryError, SchemaRegistryClient, SchemaVersion};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Registered schema strings per subject, in version order.
#[derive(Clone, Default)]
struct Registry {
    subjects: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

impl Registry {
    fn record_auth(&self, headers: &HeaderMap) {
        if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            self.auth_headers.lock().unwrap().push(value.to_string());
        }
    }
}

async fn list_subjects(State(registry): State<Registry>, headers: HeaderMap) -> Json<Vec<String>> {
    registry.record_auth(&headers);
    let subjects = registry.subjects.lock().unwrap();
    Json(subjects.iter().map(|(name, _)| name.clone()).collect())
}

async fn register(
    State(registry): State<Registry>,
    Path(subject): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if body["schemaType"] != "JSON" || serde_json::from_str::<Value>(body["schema"].as_str().unwrap_or("")).is_err() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"error_code": 42201, "message": "Invalid schema"})))
            .into_response();
    }

    let mut subjects = registry.subjects.lock().unwrap();
    let schema = body["schema"].as_str().unwrap().to_string();
    let id = match subjects.iter_mut().find(|(name, _)| *name == subject) {
        Some((_, versions)) => {
            versions.push(schema);
            versions.len()
        }
        None => {
            subjects.push((subject, vec![schema]));
            1
        }
    };
    Json(json!({"id": 100 + id})).into_response()
}

async fn list_versions(State(registry): State<Registry>, Path(subject): Path<String>) -> Json<Vec<usize>> {
    let subjects = registry.subjects.lock().unwrap();
    let count = subjects
        .iter()
        .find(|(name, _)| *name == subject)
        .map_or(0, |(_, versions)| versions.len());
    Json((1..=count).collect())
}

async fn get_version(
    State(registry): State<Registry>,
    Path((subject, version)): Path<(String, String)>,
) -> Response {
    let subjects = registry.subjects.lock().unwrap();
    let Some((_, versions)) = subjects.iter().find(|(name, _)| *name == subject) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error_code": 40401, "message": "Subject not found"})))
            .into_response();
    };
    let index = match version.as_str() {
        "latest" => versions.len(),
        n => n.parse().unwrap_or(0),
    };
    match versions.get(index.wrapping_sub(1)) {
        Some(schema) => Json(json!({
            "subject": subject,
            "version": index,
            "id": 100 + index,
            "schemaType": "JSON",
            "schema": schema,
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error_code": 40402, "message": "Version not found"})))
            .into_response(),
    }
}

async fn check_compatibility(
    State(registry): State<Registry>,
    Path((subject, _version)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let subjects = registry.subjects.lock().unwrap();
    let latest: Option<Value> = subjects
        .iter()
        .find(|(name, _)| *name == subject)
        .and_then(|(_, versions)| versions.last())
        .and_then(|schema| serde_json::from_str(schema).ok());
    let candidate: Value = serde_json::from_str(body["schema"].as_str().unwrap_or("null")).unwrap_or(Value::Null);

    // Compatible when the candidate keeps the latest version's type
    let compatible = latest.is_some_and(|latest| latest["type"] == candidate["type"]);
    Json(json!({"is_compatible": compatible}))
}

async fn start_test_server() -> (String, Registry) {
    let registry = Registry::default();
    let app = Router::new()
        .route("/subjects", get(list_subjects))
        .route("/subjects/:subject/versions", get(list_versions).post(register))
        .route("/subjects/:subject/versions/:version", get(get_version))
        .route(
            "/compatibility/subjects/:subject/versions/:version",
            post(check_compatibility),
        )
        .with_state(registry.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), registry)
}

#[tokio::test]
async fn test_register_and_fetch() {
    let (url, _registry) = start_test_server().await;
    let client = SchemaRegistryClient::connect(&RegistryConfig::new(url)).await.unwrap();
    assert!(client.subjects().await.unwrap().is_empty());

    let schema = json!({"type": "object", "required": ["id"]});
    let first = client.register("person-value", &schema).await.unwrap();
    let second = client.register("person-value", &json!({"type": "object"})).await.unwrap();
    assert_eq!((first.id, second.id), (101, 102));

    assert_eq!(client.subjects().await.unwrap(), vec!["person-value"]);
    assert_eq!(client.versions("person-value").await.unwrap(), vec![1, 2]);

    let fetched = client.schema("person-value", SchemaVersion::Number(1)).await.unwrap();
    assert_eq!(fetched.version, 1);
    assert_eq!(fetched.schema_type.as_deref(), Some("JSON"));
    assert_eq!(fetched.document().unwrap(), schema);

    let latest = client.schema("person-value", SchemaVersion::Latest).await.unwrap();
    assert_eq!(latest.version, 2);
}

#[tokio::test]
async fn test_compatibility() {
    let (url, _registry) = start_test_server().await;
    let client = SchemaRegistryClient::new(&RegistryConfig::new(url)).unwrap();
    client.register("person-value", &json!({"type": "object"})).await.unwrap();

    let same_type = json!({"type": "object", "properties": {"age": {"type": "integer"}}});
    assert!(client
        .check_compatibility("person-value", &same_type, SchemaVersion::Latest)
        .await
        .unwrap());
    assert!(!client
        .check_compatibility("person-value", &json!({"type": "string"}), SchemaVersion::Latest)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (url, _registry) = start_test_server().await;
    let client = SchemaRegistryClient::new(&RegistryConfig::new(url)).unwrap();

    match client.schema("missing", SchemaVersion::Latest).await {
        Err(RegistryError::Status { status, body, .. }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Subject not found"));
        }
        other => panic!("expected a 404, got {other:?}"),
    }
}

#[tokio::test]
async fn test_basic_auth_sent() {
    let (url, registry) = start_test_server().await;
    let config = RegistryConfig {
        url,
        api_key: Some("key".to_string()),
        api_secret: Some("secret".to_string()),
    };

    SchemaRegistryClient::connect(&config).await.unwrap();

    // base64("key:secret")
    assert_eq!(
        registry.auth_headers.lock().unwrap().as_slice(),
        ["Basic a2V5OnNlY3JldA==".to_string()]
    );
}

#[tokio::test]
async fn test_connect_fails_without_registry() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    assert!(matches!(
        SchemaRegistryClient::connect(&RegistryConfig::new(url)).await,
        Err(RegistryError::Request { .. })
    ));
}
