//! Name → sink constructor registry.

use crate::config::SinkConfig;
use crate::console::ConsoleSink;
use crate::error::SinkError;
use crate::file::FileSink;
use crate::kafka::KafkaSink;
use crate::traits::OutputSink;
use std::collections::BTreeMap;

/// Builds a sink from the run's sink settings.
pub type SinkConstructor =
    Box<dyn Fn(&SinkConfig) -> Result<Box<dyn OutputSink>, SinkError> + Send + Sync>;

/// Maps output type names to sink constructors.
///
/// The registry is built once at startup and passed to whoever selects the
/// sink, so tests can register their own sinks next to the built-in ones.
#[derive(Default)]
pub struct SinkRegistry {
    constructors: BTreeMap<String, SinkConstructor>,
}

impl SinkRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `console` (alias `terminal`), `file` and `kafka`
    /// registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("console", |_| Ok(Box::new(ConsoleSink::new())));
        registry.register("terminal", |_| Ok(Box::new(ConsoleSink::new())));
        registry.register("file", |config| {
            let path = config.output_path.as_ref().ok_or_else(|| SinkError::Config {
                sink: "file".to_string(),
                message: "an output path is required".to_string(),
            })?;
            Ok(Box::new(FileSink::new(path).with_append(config.append)))
        });
        registry.register("kafka", |config| {
            if config.kafka.topic.is_empty() {
                return Err(SinkError::Config {
                    sink: "kafka".to_string(),
                    message: "topic must not be empty".to_string(),
                });
            }
            Ok(Box::new(KafkaSink::new(config.kafka.clone())))
        });
        registry
    }

    /// Register (or replace) a constructor under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&SinkConfig) -> Result<Box<dyn OutputSink>, SinkError> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    /// Build the sink registered under `name`.
    pub fn create(&self, name: &str, config: &SinkConfig) -> Result<Box<dyn OutputSink>, SinkError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| SinkError::UnknownSink {
                name: name.to_string(),
                available: self.available(),
            })?;
        constructor(config)
    }

    /// Registered names, sorted.
    pub fn available(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }
}
