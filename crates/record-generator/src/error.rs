//! Error types for record synthesis.

/// Error raised by a [`ValueProvider`](crate::ValueProvider) for one leaf.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The pattern uses syntax the pattern generator cannot drive
    #[error("Cannot generate a value matching pattern '{pattern}': {reason}")]
    UnsupportedPattern { pattern: String, reason: String },

    /// `minimum` is above `maximum` once rounded to the requested type
    #[error("Empty numeric range: minimum {minimum} is greater than maximum {maximum}")]
    EmptyRange { minimum: f64, maximum: f64 },

    /// No integer in the range fits in an `i64`
    #[error("Integer range {minimum}..={maximum} is outside the 64-bit integer range")]
    IntegerOverflow { minimum: f64, maximum: f64 },
}

/// Error type for synthesizer operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// The provider could not produce a value for the leaf at `path`
    #[error("Failed to generate value at {path}: {source}")]
    Value {
        path: String,
        #[source]
        source: ProviderError,
    },

    /// Policy values are out of range
    #[error("Invalid synthesis policy: {0}")]
    InvalidPolicy(String),
}
