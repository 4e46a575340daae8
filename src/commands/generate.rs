//! `generate`: stream synthetic events into a sink.

use super::{load_schema, schema_location, DEFAULT_SCHEMA_DIR};
use crate::config::{parse_rate, KafkaArgs};
use anyhow::Context;
use clap::{Args, ValueEnum};
use event_sink::{SinkConfig, SinkRegistry};
use event_stream::{run_generation, CancellationToken, DeliveryPolicy, RunOptions, RunReport};
use record_generator::{LocaleValueProvider, RecordSynthesizer, SynthesisPolicy};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments for the `generate` command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Number of events to generate
    #[arg(long, default_value = "10")]
    pub count: u64,

    /// Events per second: a number, "<n>/s", "<n>/m", "<n>/h" or "unlimited"
    #[arg(long, default_value = "1")]
    pub rate: String,

    /// Output sink (console or its alias terminal, file, kafka)
    #[arg(long, default_value = "console")]
    pub output: String,

    /// Path for file output
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Directory containing the schema files
    #[arg(long, env = "EVENTGEN_SCHEMA_DIR", default_value = DEFAULT_SCHEMA_DIR)]
    pub schema_dir: PathBuf,

    /// Root schema, relative to the schema directory
    #[arg(long, default_value = "schema.json")]
    pub schema: PathBuf,

    /// Locale for generated values (e.g. en_US, fr_FR, de_DE)
    #[arg(long, env = "EVENTGEN_LOCALE")]
    pub locale: Option<String>,

    /// Random seed (same seed = same events); random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Probability that an optional property is included
    #[arg(long, default_value = "1.0")]
    pub optional_probability: f64,

    /// Minimum number of array items
    #[arg(long, default_value = "1")]
    pub array_min_items: usize,

    /// Maximum number of array items
    #[arg(long, default_value = "3")]
    pub array_max_items: usize,

    /// What to do when the sink rejects an event
    #[arg(long, value_enum, default_value = "abort")]
    pub on_delivery_error: OnDeliveryError,

    /// Validate every generated event against the schema before delivery
    #[arg(long)]
    pub validate_output: bool,

    #[command(flatten)]
    pub kafka: KafkaArgs,
}

/// `--on-delivery-error` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDeliveryError {
    Abort,
    Continue,
}

impl From<OnDeliveryError> for DeliveryPolicy {
    fn from(value: OnDeliveryError) -> Self {
        match value {
            OnDeliveryError::Abort => DeliveryPolicy::Abort,
            OnDeliveryError::Continue => DeliveryPolicy::Continue,
        }
    }
}

impl GenerateArgs {
    fn sink_config(&self) -> anyhow::Result<SinkConfig> {
        let mut config = SinkConfig {
            output_path: self.output_path.clone(),
            append: self.append,
            ..Default::default()
        };
        if self.output == "kafka" {
            config.kafka = self.kafka.to_config()?;
        }
        Ok(config)
    }
}

/// Run the `generate` command until `count` events are delivered or
/// `cancel` fires.
pub async fn run_generate(
    args: GenerateArgs,
    registry: &SinkRegistry,
    cancel: CancellationToken,
) -> anyhow::Result<RunReport> {
    let rate = parse_rate(&args.rate).with_context(|| format!("Invalid --rate '{}'", args.rate))?;

    let location = schema_location(&args.schema, &args.schema_dir);
    let schema = load_schema(&location)?;

    let sink = registry
        .create(&args.output, &args.sink_config()?)
        .with_context(|| format!("Failed to create {} output", args.output))?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let provider = LocaleValueProvider::from_tag(args.locale.as_deref());
    info!(
        "Using schema {location:?}, locale {}, seed {seed}",
        provider.locale()
    );

    let policy = SynthesisPolicy {
        optional_probability: args.optional_probability,
        array_min_items: args.array_min_items,
        array_max_items: args.array_max_items,
    };
    let mut synthesizer = RecordSynthesizer::new(provider, seed).with_policy(policy)?;

    let options = RunOptions {
        count: args.count,
        rate,
        delivery_policy: args.on_delivery_error.into(),
        validate_output: args.validate_output,
    };

    let report = run_generation(&schema, &mut synthesizer, sink.as_ref(), &options, &cancel)
        .await
        .with_context(|| format!("Event generation to {} output failed", args.output))?;

    info!(
        "Generated {} events in {:.2} seconds.",
        report.events_generated,
        report.elapsed.as_secs_f64()
    );
    info!("Actual rate: {:.2} events/second", report.actual_rate());
    if report.delivery_failures > 0 {
        warn!("{} events could not be delivered", report.delivery_failures);
    }
    if report.invalid_records > 0 {
        warn!("{} generated events failed validation", report.invalid_records);
    }

    Ok(report)
}
