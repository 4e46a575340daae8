//! Error types for generation runs.

use event_sink::DeliveryError;
use record_generator::SynthesisError;
use thiserror::Error;

/// Error rejecting a rate value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid rate {0}: must be a positive, finite number of events per second")]
pub struct InvalidRate(pub f64);

/// Errors that end a generation run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to open {sink} sink: {source}")]
    Open {
        sink: String,
        #[source]
        source: DeliveryError,
    },

    #[error("Failed to synthesize event {iteration}: {source}")]
    Synthesis {
        iteration: u64,
        #[source]
        source: SynthesisError,
    },

    #[error("Failed to deliver event {iteration}: {source}")]
    Delivery {
        iteration: u64,
        #[source]
        source: DeliveryError,
    },

    #[error("Failed to close {sink} sink: {source}")]
    Close {
        sink: String,
        #[source]
        source: DeliveryError,
    },
}
