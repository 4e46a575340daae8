//! Command-line configuration helpers.

pub mod kafka;
pub mod rate;

pub use kafka::KafkaArgs;
pub use rate::parse_rate;
