//! Command-line interface for schema-eventgen
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate 10 events at 1 event/second to the console
//! eventgen generate
//!
//! # Generate into a file with a fixed seed
//! eventgen generate --count 1000 --rate 100/s --output file \
//!   --output-path events.jsonl --seed 42
//!
//! # Validate data against a schema in schemas/
//! eventgen validate schema.json data/sample-data.json
//!
//! # Inline all references
//! eventgen resolve schema.json --output resolved.json
//!
//! # Schema Registry
//! eventgen registry list --config registry-config.json
//! eventgen registry get --config registry-config.json --subject person-value -o person.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use event_sink::SinkRegistry;
use event_stream::CancellationToken;
use schema_eventgen::{
    run_generate, run_registry, run_resolve, run_validate, GenerateArgs, RegistryArgs, ResolveArgs,
    ValidateArgs,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventgen")]
#[command(about = "Validate data against modular JSON Schemas and generate schema-conformant events")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random events from the schema at a target rate
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Validate a JSON or JSON Lines data file against a schema
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },

    /// Print a schema with every $ref inlined
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Register, fetch and check schemas in a Confluent Schema Registry
    Registry {
        #[command(flatten)]
        args: RegistryArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so console output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => {
            let cancel = setup_shutdown_handler();
            let registry = SinkRegistry::with_builtin();
            let report = run_generate(args, &registry, cancel).await?;
            if report.interrupted {
                info!("Stopped after {} events", report.events_generated);
            }
        }
        Commands::Validate { args } => {
            let summary = run_validate(&args)?;
            if !summary.is_valid() {
                anyhow::bail!(
                    "{} of {} items failed validation",
                    summary.failures.len(),
                    summary.items
                );
            }
        }
        Commands::Resolve { args } => {
            run_resolve(&args).context("Failed to resolve schema")?;
        }
        Commands::Registry { args } => {
            run_registry(&args).await?;
        }
    }

    Ok(())
}

/// Cancel the returned token on Ctrl+C.
fn setup_shutdown_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received interrupt signal (Ctrl+C)");
                trigger.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {e}"),
        }
    });

    cancel
}
