//! `registry`: manage resolved schemas in a Confluent Schema Registry.

use super::{load_schema, schema_location, DEFAULT_SCHEMA_DIR};
use anyhow::Context;
use clap::{Args, Subcommand};
use schema_registry::{RegistryConfig, SchemaRegistryClient, SchemaVersion};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the `registry` command group.
#[derive(Args, Clone, Debug)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum RegistryCommand {
    /// Register a schema, with references inlined, under a subject
    Register {
        #[command(flatten)]
        target: SubjectArgs,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// List registered subjects
    List {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Fetch a registered schema version
    Get {
        #[command(flatten)]
        target: SubjectArgs,

        /// Version number or "latest"
        #[arg(long, default_value = "latest")]
        version: SchemaVersion,

        /// Write the schema here instead of stdout
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Check a local schema against a registered version
    Check {
        #[command(flatten)]
        target: SubjectArgs,

        #[command(flatten)]
        schema: SchemaArgs,

        /// Version number or "latest"
        #[arg(long, default_value = "latest")]
        version: SchemaVersion,
    },
}

/// Registry connection settings.
#[derive(Args, Clone, Debug)]
pub struct ConnectionArgs {
    /// JSON file with `url` and optional `api_key`/`api_secret`
    #[arg(long = "config", env = "EVENTGEN_REGISTRY_CONFIG", value_name = "PATH")]
    pub config: PathBuf,
}

impl ConnectionArgs {
    async fn connect(&self) -> anyhow::Result<SchemaRegistryClient> {
        let config = RegistryConfig::from_file(&self.config)?;
        SchemaRegistryClient::connect(&config)
            .await
            .with_context(|| format!("Failed to connect to Schema Registry at {}", config.url))
    }
}

/// A connection plus the subject to act on.
#[derive(Args, Clone, Debug)]
pub struct SubjectArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Subject name, e.g. `person-value`
    #[arg(long)]
    pub subject: String,
}

/// The local schema to send.
#[derive(Args, Clone, Debug)]
pub struct SchemaArgs {
    /// Schema file; a bare file name is looked up in the schema directory
    #[arg(long, default_value = "schema.json")]
    pub schema: PathBuf,

    /// Directory used for bare schema file names
    #[arg(long, env = "EVENTGEN_SCHEMA_DIR", default_value = DEFAULT_SCHEMA_DIR)]
    pub schema_dir: PathBuf,
}

impl SchemaArgs {
    /// The schema as one document, since the registry cannot follow
    /// file-relative references.
    fn resolved(&self) -> anyhow::Result<Value> {
        let location = schema_location(&self.schema, &self.schema_dir);
        Ok(load_schema(&location)?.to_json())
    }
}

/// Run a `registry` subcommand.
pub async fn run_registry(args: &RegistryArgs) -> anyhow::Result<()> {
    match &args.command {
        RegistryCommand::Register { target, schema } => {
            let document = schema.resolved()?;
            let client = target.connection.connect().await?;
            let registered = client
                .register(&target.subject, &document)
                .await
                .with_context(|| format!("Failed to register schema for subject '{}'", target.subject))?;
            println!("Schema registered with ID: {}", registered.id);
        }
        RegistryCommand::List { connection } => {
            let client = connection.connect().await?;
            let subjects = client.subjects().await.context("Failed to list subjects")?;
            println!("Registered subjects:");
            for subject in subjects {
                println!("- {subject}");
            }
        }
        RegistryCommand::Get {
            target,
            version,
            output,
        } => {
            let client = target.connection.connect().await?;
            let registered = client
                .schema(&target.subject, *version)
                .await
                .with_context(|| format!("Failed to fetch version {version} of subject '{}'", target.subject))?;
            let document = registered
                .document()
                .context("Registry returned a schema that is not JSON")?;
            let rendered = serde_json::to_string_pretty(&document)?;

            match output {
                Some(path) => {
                    std::fs::write(path, format!("{rendered}\n"))
                        .with_context(|| format!("Failed to write schema to {path:?}"))?;
                    info!("Fetched version {} (ID {})", registered.version, registered.id);
                    println!("Schema saved to {}", path.display());
                }
                None => println!("{rendered}"),
            }
        }
        RegistryCommand::Check {
            target,
            schema,
            version,
        } => {
            let document = schema.resolved()?;
            let client = target.connection.connect().await?;
            let compatible = client
                .check_compatibility(&target.subject, &document, *version)
                .await
                .with_context(|| format!("Failed to check compatibility for subject '{}'", target.subject))?;
            if compatible {
                println!("Schema is compatible");
            } else {
                println!("Schema is not compatible");
            }
        }
    }
    Ok(())
}
