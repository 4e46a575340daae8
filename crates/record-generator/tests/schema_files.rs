//! Synthesis against schemas loaded from disk.

use record_generator::{LocaleValueProvider, RecordSynthesizer, SynthesisError};
use schema_core::{validate, SchemaResolver};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn contact_schemas(dir: &TempDir) -> PathBuf {
    write(
        dir,
        "phone.json",
        r#"{
            "type": "object",
            "properties": {
                "type": {"type": "string", "enum": ["phone"]},
                "phoneNumber": {"type": "string", "pattern": "^[0-9]{10}$"},
                "countryCode": {"type": "string"}
            },
            "required": ["type", "phoneNumber"]
        }"#,
    );
    write(
        dir,
        "address.yaml",
        r#"
type: object
properties:
  type: {type: string, enum: [address]}
  street: {type: string}
  city: {type: string}
  postalCode: {type: string, pattern: "^[0-9]{5}$"}
required: [type, street, city]
"#,
    );
    write(
        dir,
        "root.json",
        r#"{
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0, "maximum": 120},
                "contactInfo": {"oneOf": [{"$ref": "phone.json"}, {"$ref": "address.yaml"}]},
                "tags": {"type": "array", "items": {"type": "string"}},
                "metadata": {
                    "type": "object",
                    "properties": {
                        "joinDate": {"type": "string", "format": "date"},
                        "status": {"enum": ["active", "inactive", null]}
                    }
                }
            },
            "required": ["id", "name", "contactInfo"]
        }"#,
    )
}

#[test]
fn test_records_from_cross_file_schema_validate() {
    let dir = TempDir::new().unwrap();
    let root = contact_schemas(&dir);
    let schema = SchemaResolver::default().resolve_file(&root).unwrap();

    for locale in ["en_US", "fr_FR", "de_DE"] {
        let provider = LocaleValueProvider::from_tag(Some(locale));
        let mut synthesizer = RecordSynthesizer::new(provider, 2024);

        for record in synthesizer.records(&schema, 100) {
            let record = record.unwrap();
            let result = validate(&schema, &record);
            assert!(result.valid, "[{locale}] {record}: {result}");
        }
    }
}

#[test]
fn test_unsupported_pattern_fails_synthesis() {
    let dir = TempDir::new().unwrap();
    let root = write(
        &dir,
        "root.json",
        r#"{
            "type": "object",
            "properties": {"sku": {"type": "string", "pattern": "^(AB|CD)-[0-9]{3}$"}},
            "required": ["sku"]
        }"#,
    );
    let schema = SchemaResolver::default().resolve_file(&root).unwrap();
    let mut synthesizer = RecordSynthesizer::new(LocaleValueProvider::default(), 1);

    let error = synthesizer.synthesize(&schema).unwrap_err();
    assert!(matches!(error, SynthesisError::Value { ref path, .. } if path == "$.sku"));
}
