//! Generation run driver: synthesize → deliver → pace, `count` times.

use crate::error::RunError;
use crate::rate::{Rate, RateScheduler};
use crate::report::RunReport;
use event_sink::{OutputSink, SinkHandle};
use record_generator::{RecordSynthesizer, ValueProvider};
use schema_core::{validate, SchemaNode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Progress is logged every this many events.
const PROGRESS_INTERVAL: u64 = 1000;

/// What to do when a sink rejects a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Stop the run with [`RunError::Delivery`].
    #[default]
    Abort,
    /// Log the failure, count it and carry on.
    Continue,
}

/// Per-run settings.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of records to generate.
    pub count: u64,
    pub rate: Rate,
    pub delivery_policy: DeliveryPolicy,
    /// Validate each record against the schema before delivery.
    pub validate_output: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            count: 10,
            rate: Rate::PerSecond(1.0),
            delivery_policy: DeliveryPolicy::Abort,
            validate_output: false,
        }
    }
}

/// Run one generation pass against `sink`.
///
/// The sink is opened once, and closed once on every exit path: normal
/// completion, cancellation, and synthesis or delivery failure. A close
/// failure after an earlier error is logged and the earlier error returned.
pub async fn run_generation<P: ValueProvider>(
    schema: &SchemaNode,
    synthesizer: &mut RecordSynthesizer<P>,
    sink: &dyn OutputSink,
    options: &RunOptions,
    cancel: &CancellationToken,
) -> Result<RunReport, RunError> {
    let mut handle = sink.open().await.map_err(|source| RunError::Open {
        sink: sink.name().to_string(),
        source,
    })?;

    let outcome = drive(schema, synthesizer, handle.as_mut(), options, cancel).await;

    match (outcome, handle.close().await) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(source)) => Err(RunError::Close {
            sink: sink.name().to_string(),
            source,
        }),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!("Failed to close {} sink after error: {close_err}", sink.name());
            Err(err)
        }
    }
}

async fn drive<P: ValueProvider>(
    schema: &SchemaNode,
    synthesizer: &mut RecordSynthesizer<P>,
    handle: &mut dyn SinkHandle,
    options: &RunOptions,
    cancel: &CancellationToken,
) -> Result<RunReport, RunError> {
    let mut report = RunReport::default();
    let mut state = RateScheduler::new(options.rate).start();

    info!("Generating {} events at {}", options.count, options.rate);

    for iteration in 1..=options.count {
        if cancel.is_cancelled() {
            break;
        }

        let record = synthesizer
            .synthesize(schema)
            .map_err(|source| RunError::Synthesis { iteration, source })?;
        report.events_generated += 1;

        if options.validate_output {
            let result = validate(schema, &record);
            if !result.valid {
                warn!("Event {iteration} failed validation: {result}");
                report.invalid_records += 1;
            }
        }

        match handle.deliver(&record).await {
            Ok(()) => {
                report.events_delivered += 1;
                debug!("Delivered event {iteration}");
            }
            Err(source) => match options.delivery_policy {
                DeliveryPolicy::Abort => return Err(RunError::Delivery { iteration, source }),
                DeliveryPolicy::Continue => {
                    warn!("Failed to deliver event {iteration}: {source}");
                    report.delivery_failures += 1;
                }
            },
        }

        if iteration % PROGRESS_INTERVAL == 0 {
            info!("Generated {iteration}/{} events", options.count);
        }

        if !state.pace_until_cancelled(cancel).await {
            break;
        }
    }

    report.elapsed = state.elapsed();
    report.interrupted = report.events_generated < options.count;
    if report.interrupted {
        info!("Event generation interrupted.");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_sink::DeliveryError;
    use record_generator::LocaleValueProvider;
    use schema_core::{LeafConstraints, ObjectNode, PrimitiveType};
    use serde_json::{json, Value};
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records every delivery and counts closes.
    #[derive(Clone, Default)]
    struct MemorySink {
        records: Arc<Mutex<Vec<Value>>>,
        closes: Arc<Mutex<u32>>,
        /// 1-based delivery numbers that fail.
        fail_on: Vec<u64>,
        fail_open: bool,
    }

    struct MemoryHandle {
        sink: MemorySink,
        attempts: u64,
    }

    #[async_trait::async_trait]
    impl OutputSink for MemorySink {
        fn name(&self) -> &str {
            "memory"
        }

        async fn open(&self) -> Result<Box<dyn SinkHandle>, DeliveryError> {
            if self.fail_open {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied").into());
            }
            Ok(Box::new(MemoryHandle {
                sink: self.clone(),
                attempts: 0,
            }))
        }
    }

    #[async_trait::async_trait]
    impl SinkHandle for MemoryHandle {
        async fn deliver(&mut self, record: &Value) -> Result<(), DeliveryError> {
            self.attempts += 1;
            if self.sink.fail_on.contains(&self.attempts) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink unavailable").into());
            }
            self.sink.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn close(self: Box<Self>) -> Result<(), DeliveryError> {
            *self.sink.closes.lock().unwrap() += 1;
            Ok(())
        }
    }

    impl MemorySink {
        fn records(&self) -> Vec<Value> {
            self.records.lock().unwrap().clone()
        }

        fn closes(&self) -> u32 {
            *self.closes.lock().unwrap()
        }
    }

    fn schema() -> SchemaNode {
        let string = SchemaNode::Leaf(LeafConstraints {
            types: vec![PrimitiveType::String],
            ..Default::default()
        });
        SchemaNode::Object(ObjectNode {
            properties: vec![("id".to_string(), string.clone()), ("name".to_string(), string)],
            required: ["id".to_string(), "name".to_string()].into_iter().collect(),
        })
    }

    fn synthesizer() -> RecordSynthesizer<LocaleValueProvider> {
        RecordSynthesizer::new(LocaleValueProvider::default(), 42)
    }

    fn options(count: u64, rate: Rate) -> RunOptions {
        RunOptions {
            count,
            rate,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unlimited_run_delivers_count_valid_records() {
        let schema = schema();
        let sink = MemorySink::default();

        let report = run_generation(
            &schema,
            &mut synthesizer(),
            &sink,
            &options(5, Rate::Unlimited),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.events_generated, 5);
        assert_eq!(report.events_delivered, 5);
        assert!(!report.interrupted);
        assert_eq!(sink.closes(), 1);

        let records = sink.records();
        assert_eq!(records.len(), 5);
        for record in &records {
            assert!(validate(&schema, record).valid, "{record}");
        }
    }

    #[tokio::test]
    async fn test_run_keeps_target_rate() {
        let sink = MemorySink::default();

        let report = run_generation(
            &schema(),
            &mut synthesizer(),
            &sink,
            &options(100, Rate::PerSecond(100.0)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let elapsed = report.elapsed.as_secs_f64();
        assert!((0.95..=1.3).contains(&elapsed), "took {elapsed}s");
        assert_eq!(report.events_delivered, 100);
    }

    #[tokio::test]
    async fn test_abort_policy_stops_and_closes() {
        let sink = MemorySink {
            fail_on: vec![3],
            ..Default::default()
        };

        let result = run_generation(
            &schema(),
            &mut synthesizer(),
            &sink,
            &options(5, Rate::Unlimited),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(RunError::Delivery { iteration: 3, .. })));
        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.closes(), 1);
    }

    #[tokio::test]
    async fn test_continue_policy_counts_failures() {
        let sink = MemorySink {
            fail_on: vec![2, 4],
            ..Default::default()
        };
        let run_options = RunOptions {
            delivery_policy: DeliveryPolicy::Continue,
            ..options(5, Rate::Unlimited)
        };

        let report = run_generation(
            &schema(),
            &mut synthesizer(),
            &sink,
            &run_options,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.events_generated, 5);
        assert_eq!(report.events_delivered, 3);
        assert_eq!(report.delivery_failures, 2);
        assert_eq!(sink.closes(), 1);
    }

    #[tokio::test]
    async fn test_open_failure() {
        let sink = MemorySink {
            fail_open: true,
            ..Default::default()
        };

        let result = run_generation(
            &schema(),
            &mut synthesizer(),
            &sink,
            &options(1, Rate::Unlimited),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(RunError::Open { ref sink, .. }) if sink == "memory"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_still_closes_sink() {
        let schema = SchemaNode::Leaf(LeafConstraints {
            types: vec![PrimitiveType::String],
            pattern: Some(schema_core::Pattern::new("(x|y)").unwrap()),
            ..Default::default()
        });
        let sink = MemorySink::default();

        let result = run_generation(
            &schema,
            &mut synthesizer(),
            &sink,
            &options(3, Rate::Unlimited),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(RunError::Synthesis { iteration: 1, .. })));
        assert_eq!(sink.closes(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let sink = MemorySink::default();

        let report = run_generation(
            &schema(),
            &mut synthesizer(),
            &sink,
            &options(10, Rate::Unlimited),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(report.events_generated, 0);
        assert!(report.interrupted);
        assert_eq!(sink.closes(), 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_paced_run() {
        let cancel = CancellationToken::new();
        let sink = MemorySink::default();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            trigger.cancel();
        });

        let report = run_generation(
            &schema(),
            &mut synthesizer(),
            &sink,
            &options(100, Rate::PerSecond(10.0)),
            &cancel,
        )
        .await
        .unwrap();

        assert!(report.interrupted);
        assert!(report.events_generated >= 1 && report.events_generated < 100);
        assert!(report.elapsed < Duration::from_secs(1));
        assert_eq!(sink.closes(), 1);
    }

    #[tokio::test]
    async fn test_validate_output_counts_invalid_records() {
        struct WrongTypeProvider;

        impl ValueProvider for WrongTypeProvider {
            fn generate<R: rand::Rng>(
                &self,
                _request: &record_generator::ValueRequest<'_>,
                _rng: &mut R,
            ) -> Result<Value, record_generator::ProviderError> {
                Ok(json!(42))
            }
        }

        let sink = MemorySink::default();
        let run_options = RunOptions {
            validate_output: true,
            ..options(4, Rate::Unlimited)
        };

        let report = run_generation(
            &schema(),
            &mut RecordSynthesizer::new(WrongTypeProvider, 1),
            &sink,
            &run_options,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.invalid_records, 4);
        assert_eq!(report.events_delivered, 4);
    }
}
