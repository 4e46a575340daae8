//! Subcommand arguments and handlers.

pub mod generate;
pub mod registry;
pub mod resolve;
pub mod validate;

use anyhow::Context;
use schema_core::{SchemaNode, SchemaResolver};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default directory holding the schema set.
pub const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// Locate a schema file: a bare file name is looked up in `schema_dir`, any
/// path with a directory component is used as given.
pub fn schema_location(schema: &Path, schema_dir: &Path) -> PathBuf {
    let bare = schema
        .parent()
        .map_or(true, |parent| parent.as_os_str().is_empty());
    if bare {
        schema_dir.join(schema)
    } else {
        schema.to_path_buf()
    }
}

/// Load and fully resolve the schema at `location`.
pub fn load_schema(location: &Path) -> anyhow::Result<SchemaNode> {
    let mut resolver = SchemaResolver::default();
    let schema = resolver
        .resolve_file(location)
        .with_context(|| format!("Failed to load schema from {location:?}"))?;
    debug!(
        "Resolved {location:?} from {} schema document(s)",
        resolver.store().loaded_count()
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_location() {
        let dir = Path::new("schemas");
        assert_eq!(
            schema_location(Path::new("schema.json"), dir),
            PathBuf::from("schemas/schema.json")
        );
        assert_eq!(
            schema_location(Path::new("other/schema.json"), dir),
            PathBuf::from("other/schema.json")
        );
        assert_eq!(
            schema_location(Path::new("/abs/schema.json"), dir),
            PathBuf::from("/abs/schema.json")
        );
    }
}
