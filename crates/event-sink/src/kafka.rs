//! Kafka sink: one JSON message per record.

use crate::config::KafkaSinkConfig;
use crate::error::DeliveryError;
use crate::traits::{OutputSink, SinkHandle};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// How long a single send may wait in the producer queue.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// How long `close` waits for outstanding messages.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes records to a Kafka topic.
///
/// # Example
///
/// ```ignore
/// let config = KafkaSinkConfig::from_file("kafka-config.json")?;
/// let sink = KafkaSink::new(config);
/// let mut handle = sink.open().await?;
/// handle.deliver(&record).await?;
/// handle.close().await?;
/// ```
#[derive(Debug, Clone)]
pub struct KafkaSink {
    config: KafkaSinkConfig,
}

impl KafkaSink {
    pub fn new(config: KafkaSinkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KafkaSinkConfig {
        &self.config
    }

    /// Producer settings: defaults first, then the configured extras.
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new();
        client
            .set("bootstrap.servers", &self.config.bootstrap_servers)
            .set("message.timeout.ms", "30000");
        for (key, value) in self.config.producer_properties() {
            client.set(key, value);
        }
        client
    }
}

#[async_trait::async_trait]
impl OutputSink for KafkaSink {
    fn name(&self) -> &str {
        "kafka"
    }

    async fn open(&self) -> Result<Box<dyn SinkHandle>, DeliveryError> {
        let producer: FutureProducer = self.client_config().create()?;

        info!(
            "Publishing events to Kafka topic '{}' at {}",
            self.config.topic, self.config.bootstrap_servers
        );

        Ok(Box::new(KafkaHandle {
            producer,
            topic: self.config.topic.clone(),
            key_field: self.config.key_field.clone(),
            published: 0,
        }))
    }
}

struct KafkaHandle {
    producer: FutureProducer,
    topic: String,
    key_field: Option<String>,
    published: u64,
}

/// Message key for a record: the key field's value, strings taken as-is and
/// any other JSON value rendered as JSON text.
pub fn message_key(record: &Value, key_field: Option<&str>) -> Option<String> {
    let value = record.get(key_field?)?;
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait::async_trait]
impl SinkHandle for KafkaHandle {
    async fn deliver(&mut self, record: &Value) -> Result<(), DeliveryError> {
        let payload = serde_json::to_string(record)?;
        let key = message_key(record, self.key_field.as_deref());

        let mut message = FutureRecord::<str, str>::to(&self.topic).payload(&payload);
        if let Some(key) = key.as_deref() {
            message = message.key(key);
        }

        self.producer
            .send(message, SEND_TIMEOUT)
            .await
            .map_err(|(err, _)| err)?;

        debug!("Published message {} to '{}'", self.published + 1, self.topic);
        self.published += 1;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), DeliveryError> {
        self.producer.flush(FLUSH_TIMEOUT)?;
        info!(
            "Flushed Kafka producer after {} messages to '{}'",
            self.published, self.topic
        );
        Ok(())
    }
}
