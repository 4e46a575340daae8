//! Error types for schema loading and resolution.

use std::path::{Path, PathBuf};

/// Error type for schema operations.
///
/// Every variant is fatal for a generation run: the resolved schema graph is
/// a precondition for both validation and synthesis.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file does not exist
    #[error(
        "Schema file not found: {}{}",
        .location.display(),
        origin_suffix(.referenced_from)
    )]
    NotFound {
        location: PathBuf,
        referenced_from: Option<PathBuf>,
    },

    /// The schema file exists but could not be read
    #[error("Failed to read schema file {}: {source}", .location.display())]
    Io {
        location: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not well-formed JSON/YAML
    #[error(
        "Failed to parse schema file {}: {message}{}",
        .location.display(),
        origin_suffix(.referenced_from)
    )]
    Parse {
        location: PathBuf,
        message: String,
        referenced_from: Option<PathBuf>,
    },

    /// `$ref` chain loops back onto a document still being resolved
    #[error("Cyclic $ref detected: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// `$ref` form this resolver does not handle (remote URIs, anchors)
    #[error("Unsupported $ref '{reference}' in {}: {reason}", .location.display())]
    UnsupportedReference {
        location: PathBuf,
        reference: String,
        reason: String,
    },

    /// `$ref` fragment points at nothing
    #[error("$ref target '#{pointer}' does not exist in {}", .location.display())]
    DanglingPointer { location: PathBuf, pointer: String },

    /// A keyword has a value the resolver cannot interpret
    #[error("Invalid schema at {}#{pointer}: {message}", .location.display())]
    Invalid {
        location: PathBuf,
        pointer: String,
        message: String,
    },
}

impl SchemaError {
    /// Attach the referencing document to load failures raised while following a `$ref`.
    pub fn referenced_from(self, origin: &Path) -> Self {
        match self {
            SchemaError::NotFound { location, .. } => SchemaError::NotFound {
                location,
                referenced_from: Some(origin.to_path_buf()),
            },
            SchemaError::Parse {
                location, message, ..
            } => SchemaError::Parse {
                location,
                message,
                referenced_from: Some(origin.to_path_buf()),
            },
            other => other,
        }
    }
}

fn origin_suffix(origin: &Option<PathBuf>) -> String {
    match origin {
        Some(path) => format!(" (referenced from {})", path.display()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mentions_referencing_document() {
        let err = SchemaError::NotFound {
            location: PathBuf::from("/schemas/missing.json"),
            referenced_from: None,
        }
        .referenced_from(Path::new("/schemas/schema.json"));

        let message = err.to_string();
        assert!(message.contains("/schemas/missing.json"));
        assert!(message.contains("referenced from /schemas/schema.json"));
    }

    #[test]
    fn test_cycle_chain_display() {
        let err = SchemaError::CyclicReference {
            chain: vec!["a.json#".to_string(), "b.json#".to_string(), "a.json#".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Cyclic $ref detected: a.json# -> b.json# -> a.json#"
        );
    }
}
