//! `resolve`: print a schema with every reference inlined.

use super::{load_schema, schema_location, DEFAULT_SCHEMA_DIR};
use anyhow::Context;
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the `resolve` command.
#[derive(Args, Clone, Debug)]
pub struct ResolveArgs {
    /// Schema file; a bare file name is looked up in the schema directory
    pub schema: PathBuf,

    /// Write the resolved schema here instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Directory used for bare schema file names
    #[arg(long, env = "EVENTGEN_SCHEMA_DIR", default_value = DEFAULT_SCHEMA_DIR)]
    pub schema_dir: PathBuf,
}

/// Resolve the schema into a single self-contained document.
pub fn resolve_document(args: &ResolveArgs) -> anyhow::Result<Value> {
    let location = schema_location(&args.schema, &args.schema_dir);
    Ok(load_schema(&location)?.to_json())
}

/// Run the `resolve` command.
pub fn run_resolve(args: &ResolveArgs) -> anyhow::Result<()> {
    let document = resolve_document(args)?;
    let rendered = serde_json::to_string_pretty(&document)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write resolved schema to {path:?}"))?;
            info!("Wrote resolved schema to {path:?}");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
