//! `validate`: check a data file against a schema.

use super::{load_schema, schema_location, DEFAULT_SCHEMA_DIR};
use anyhow::Context;
use clap::Args;
use schema_core::{validate, SchemaNode, ValidationResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Arguments for the `validate` command.
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Schema file; a bare file name is looked up in the schema directory
    pub schema: PathBuf,

    /// Data file: a JSON document (an array is validated item by item) or JSON Lines
    pub data: PathBuf,

    /// Directory used for bare schema file names
    #[arg(long, env = "EVENTGEN_SCHEMA_DIR", default_value = DEFAULT_SCHEMA_DIR)]
    pub schema_dir: PathBuf,
}

/// Per-item validation outcome for one data file.
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    pub items: usize,
    /// 1-based item number and its failed result.
    pub failures: Vec<(usize, ValidationResult)>,
}

impl ValidationSummary {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load a JSON document, falling back to JSON Lines (one value per line,
/// blank lines skipped) when the whole file is not a single document.
pub fn load_json_file(path: &Path) -> anyhow::Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;

    if let Ok(document) = serde_json::from_str(&content) {
        return Ok(document);
    }

    let mut items = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item: Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {} of {path:?}", index + 1))?;
        items.push(item);
    }
    if items.is_empty() {
        anyhow::bail!("No valid JSON objects found in {path:?}");
    }
    Ok(Value::Array(items))
}

/// Validate `data` against `schema`; a top-level array is treated as a list
/// of items.
pub fn validate_data(schema: &SchemaNode, data: &Value) -> ValidationSummary {
    let items: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    let failures = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let result = validate(schema, item);
            (!result.valid).then_some((index + 1, result))
        })
        .collect();

    ValidationSummary {
        items: items.len(),
        failures,
    }
}

/// Run the `validate` command, printing the outcome to stdout.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<ValidationSummary> {
    let location = schema_location(&args.schema, &args.schema_dir);
    let schema = load_schema(&location)?;
    let data = load_json_file(&args.data)?;

    println!(
        "Validating {} against schema {}...",
        args.data.display(),
        location.display()
    );

    let summary = validate_data(&schema, &data);
    for (item, result) in &summary.failures {
        println!("Item {item}: Validation error:");
        for issue in &result.errors {
            println!("  {issue}");
        }
    }

    if summary.is_valid() {
        println!("All data is valid according to the schema!");
    } else {
        println!("Validation failed.");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_core::{LeafConstraints, ObjectNode, PrimitiveType};
    use serde_json::json;
    use tempfile::TempDir;

    fn id_schema() -> SchemaNode {
        let mut object = ObjectNode::default();
        object.properties.push((
            "id".to_string(),
            SchemaNode::Leaf(LeafConstraints {
                types: vec![PrimitiveType::String],
                ..Default::default()
            }),
        ));
        object.required.insert("id".to_string());
        SchemaNode::Object(object)
    }

    #[test]
    fn test_load_json_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "[{\"id\": \"a\"},\n {\"id\": \"b\"}]").unwrap();

        assert_eq!(load_json_file(&path).unwrap(), json!([{"id": "a"}, {"id": "b"}]));
    }

    #[test]
    fn test_load_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.jsonl");
        std::fs::write(&path, "{\"id\": \"a\"}\n\n{\"id\": \"b\"}\n").unwrap();

        assert_eq!(load_json_file(&path).unwrap(), json!([{"id": "a"}, {"id": "b"}]));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "not json\n").unwrap();
        assert!(load_json_file(&path).is_err());

        std::fs::write(&path, "\n\n").unwrap();
        let err = load_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("No valid JSON objects"));
    }

    #[test]
    fn test_validate_data_numbers_failures() {
        let schema = id_schema();
        let summary = validate_data(&schema, &json!([{"id": "a"}, {"id": 1}, {}]));

        assert_eq!(summary.items, 3);
        assert!(!summary.is_valid());
        let failed: Vec<usize> = summary.failures.iter().map(|(item, _)| *item).collect();
        assert_eq!(failed, vec![2, 3]);
    }

    #[test]
    fn test_validate_single_document() {
        let summary = validate_data(&id_schema(), &json!({"id": "a"}));
        assert_eq!(summary.items, 1);
        assert!(summary.is_valid());
    }
}
