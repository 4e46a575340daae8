//! Schema document loading and caching.

use crate::error::SchemaError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A raw schema document identified by its canonical location.
#[derive(Debug)]
pub struct SchemaDocument {
    location: PathBuf,
    root: Value,
}

impl SchemaDocument {
    /// Create a document from an already parsed value.
    pub fn new(location: impl Into<PathBuf>, root: Value) -> Self {
        Self {
            location: location.into(),
            root,
        }
    }

    /// Canonical (absolute, normalized) location of the document.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Directory that relative references are resolved against.
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new("/"))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a JSON pointer inside the document (`""` is the root).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer)
    }
}

/// Where a `$ref` points: a document location and a pointer inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceTarget {
    pub location: PathBuf,
    pub pointer: String,
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.location.display(), self.pointer)
    }
}

/// Loads schema documents from disk and caches them by canonical location.
///
/// Each location is read at most once per store. The cache is filled during
/// resolution and only read afterwards.
#[derive(Debug, Default)]
pub struct SchemaStore {
    documents: HashMap<PathBuf, Arc<SchemaDocument>>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a schema document, returning the cached copy when present.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
    /// as JSON.
    pub fn load(&mut self, location: impl AsRef<Path>) -> Result<Arc<SchemaDocument>, SchemaError> {
        let location = canonical_location(location.as_ref())?;

        if let Some(document) = self.documents.get(&location) {
            debug!("Schema cache hit: {}", location.display());
            return Ok(Arc::clone(document));
        }

        let content = fs::read_to_string(&location).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SchemaError::NotFound {
                location: location.clone(),
                referenced_from: None,
            },
            _ => SchemaError::Io {
                location: location.clone(),
                source,
            },
        })?;

        let root = parse_document(&location, &content)?;
        debug!("Loaded schema document {}", location.display());

        let document = Arc::new(SchemaDocument::new(location.clone(), root));
        self.documents.insert(location, Arc::clone(&document));
        Ok(document)
    }

    /// Whether a location has already been loaded.
    pub fn is_cached(&self, location: impl AsRef<Path>) -> bool {
        canonical_location(location.as_ref())
            .map(|location| self.documents.contains_key(&location))
            .unwrap_or(false)
    }

    /// Number of distinct documents loaded so far.
    pub fn loaded_count(&self) -> usize {
        self.documents.len()
    }

    /// Compute the target of a `$ref` string found in `referencing`.
    ///
    /// The file part is resolved against the referencing document's
    /// directory, never the process working directory. A reference made of
    /// only a fragment targets the referencing document itself.
    pub fn resolve_reference(
        &self,
        referencing: &SchemaDocument,
        reference: &str,
    ) -> Result<ReferenceTarget, SchemaError> {
        let unsupported = |reason: &str| SchemaError::UnsupportedReference {
            location: referencing.location().to_path_buf(),
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        let (file_part, fragment) = match reference.split_once('#') {
            Some((file, fragment)) => (file, fragment),
            None => (reference, ""),
        };

        if file_part.contains("://") {
            return Err(unsupported("remote references are not supported"));
        }
        // A fragment is a URI-encoded JSON pointer, e.g. `#/definitions/a%20b`
        let fragment = urlencoding::decode(fragment)
            .map_err(|_| unsupported("fragment is not valid percent-encoded UTF-8"))?;
        if !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(unsupported("only JSON pointer fragments are supported"));
        }

        let location = if file_part.is_empty() {
            referencing.location().to_path_buf()
        } else {
            referencing.directory().join(file_part)
        };

        Ok(ReferenceTarget {
            location,
            pointer: fragment.trim_end_matches('/').to_string(),
        })
    }
}

fn canonical_location(location: &Path) -> Result<PathBuf, SchemaError> {
    fs::canonicalize(location).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SchemaError::NotFound {
            location: location.to_path_buf(),
            referenced_from: None,
        },
        _ => SchemaError::Io {
            location: location.to_path_buf(),
            source,
        },
    })
}

fn parse_document(location: &Path, content: &str) -> Result<Value, SchemaError> {
    let is_yaml = location
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| SchemaError::Parse {
        location: location.to_path_buf(),
        message,
        referenced_from: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_caches_by_canonical_location() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.json", r#"{"type": "string"}"#);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let mut store = SchemaStore::new();
        let first = store.load(&path).unwrap();
        // Same file through a non-normalized path
        let second = store
            .load(dir.path().join("nested").join("..").join("a.json"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.loaded_count(), 1);
        assert!(store.is_cached(&path));
    }

    #[test]
    fn test_cached_document_is_not_reread() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.json", r#"{"type": "string"}"#);

        let mut store = SchemaStore::new();
        store.load(&path).unwrap();
        fs::write(&path, "not json at all").unwrap();

        let document = store.load(&path).unwrap();
        assert_eq!(document.root()["type"], "string");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = SchemaStore::new();

        let result = store.load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(SchemaError::NotFound { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.json", r#"{"type": "#);
        let mut store = SchemaStore::new();

        let result = store.load(&path);
        assert!(matches!(result, Err(SchemaError::Parse { .. })));
    }

    #[test]
    fn test_load_yaml_document() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.yaml", "type: object\nrequired: [id]\n");
        let mut store = SchemaStore::new();

        let document = store.load(&path).unwrap();
        assert_eq!(document.root()["required"][0], "id");
    }

    #[test]
    fn test_reference_resolves_against_referencing_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("contacts")).unwrap();
        let path = write(&dir, "contacts/root.json", "{}");

        let mut store = SchemaStore::new();
        let document = store.load(&path).unwrap();

        let target = store
            .resolve_reference(&document, "phone.json#/definitions/number")
            .unwrap();
        assert_eq!(target.location, document.directory().join("phone.json"));
        assert!(target.location.ends_with("contacts/phone.json"));
        assert_eq!(target.pointer, "/definitions/number");

        let local = store.resolve_reference(&document, "#/definitions/x").unwrap();
        assert_eq!(local.location, document.location());
    }

    #[test]
    fn test_remote_reference_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.json", "{}");
        let mut store = SchemaStore::new();
        let document = store.load(&path).unwrap();

        let result = store.resolve_reference(&document, "https://example.com/a.json");
        assert!(matches!(
            result,
            Err(SchemaError::UnsupportedReference { .. })
        ));
    }

    #[test]
    fn test_fragment_is_percent_decoded() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.json", r#"{"definitions": {"a b": {"type": "string"}}}"#);
        let mut store = SchemaStore::new();
        let document = store.load(&path).unwrap();

        let target = store.resolve_reference(&document, "#/definitions/a%20b").unwrap();
        assert_eq!(target.pointer, "/definitions/a b");
        assert_eq!(document.root().pointer(&target.pointer).unwrap()["type"], "string");

        assert!(matches!(
            store.resolve_reference(&document, "#/definitions/%FF"),
            Err(SchemaError::UnsupportedReference { .. })
        ));
    }
}
