//! Rate-controlled event generation.
//!
//! Ties the pieces together: a resolved schema, a [`RecordSynthesizer`],
//! an [`OutputSink`] and a [`RateScheduler`].
//!
//! ```text
//!            ┌──────────── count iterations ────────────┐
//!            │                                          │
//!  cancel? ──┴─▶ synthesize ─▶ [validate] ─▶ deliver ─▶ pace
//!                                                       │
//!                                       sleep until next_deadline,
//!                                       next_deadline += 1/rate
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let schema = SchemaResolver::default().resolve_file("schemas/schema.json")?;
//! let mut synthesizer = RecordSynthesizer::new(LocaleValueProvider::default(), 42);
//! let sink = SinkRegistry::with_builtin().create("console", &SinkConfig::default())?;
//!
//! let options = RunOptions { count: 100, rate: Rate::per_second(10.0)?, ..Default::default() };
//! let report = run_generation(&schema, &mut synthesizer, sink.as_ref(), &options, &CancellationToken::new()).await?;
//! println!("{} events at {:.2}/s", report.events_generated, report.actual_rate());
//! ```
//!
//! [`RecordSynthesizer`]: record_generator::RecordSynthesizer
//! [`OutputSink`]: event_sink::OutputSink

pub mod driver;
pub mod error;
pub mod rate;
pub mod report;

pub use driver::{run_generation, DeliveryPolicy, RunOptions};
pub use error::{InvalidRate, RunError};
pub use rate::{Rate, RateScheduler, RateState};
pub use report::RunReport;
pub use tokio_util::sync::CancellationToken;
