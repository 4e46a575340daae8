//! Kafka sink options.

use anyhow::Context;
use clap::Args;
use event_sink::KafkaSinkConfig;
use std::path::PathBuf;

/// Kafka options for the `generate` command.
///
/// Settings start from `--kafka-config` (or built-in defaults) and any flag
/// given on the command line replaces the corresponding file value.
/// `KAFKA_BOOTSTRAP_SERVERS` stands in for `--kafka-bootstrap-servers`, so
/// when it is set it also takes precedence over the file.
#[derive(Args, Clone, Debug, Default)]
pub struct KafkaArgs {
    /// Path to a Kafka configuration JSON file
    #[arg(long, value_name = "PATH")]
    pub kafka_config: Option<PathBuf>,

    /// Comma-separated Kafka broker addresses (default: localhost:9092);
    /// overrides the config file, as does KAFKA_BOOTSTRAP_SERVERS
    #[arg(long, env = "KAFKA_BOOTSTRAP_SERVERS")]
    pub kafka_bootstrap_servers: Option<String>,

    /// Kafka topic to publish events to (default: events)
    #[arg(long)]
    pub kafka_topic: Option<String>,

    /// Event field used as the message key (default: id, empty string for no key)
    #[arg(long)]
    pub kafka_key_field: Option<String>,
}

impl KafkaArgs {
    /// Merge the config file and command-line flags.
    pub fn to_config(&self) -> anyhow::Result<KafkaSinkConfig> {
        let mut config = match &self.kafka_config {
            Some(path) => KafkaSinkConfig::from_file(path)
                .with_context(|| format!("Failed to load Kafka config from {path:?}"))?,
            None => KafkaSinkConfig::default(),
        };

        if let Some(servers) = &self.kafka_bootstrap_servers {
            config.bootstrap_servers = servers.clone();
        }
        if let Some(topic) = &self.kafka_topic {
            config.topic = topic.clone();
        }
        if let Some(key_field) = &self.kafka_key_field {
            config.key_field = (!key_field.is_empty()).then(|| key_field.clone());
        }
        Ok(config)
    }
}
