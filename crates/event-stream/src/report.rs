//! Run outcome metrics.

use std::time::Duration;

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Records synthesized.
    pub events_generated: u64,
    /// Records the sink accepted.
    pub events_delivered: u64,
    /// Deliveries that failed and were skipped.
    pub delivery_failures: u64,
    /// Records that failed output validation.
    pub invalid_records: u64,
    /// Total time taken.
    pub elapsed: Duration,
    /// The run stopped before reaching the requested count.
    pub interrupted: bool,
}

impl RunReport {
    /// Calculate events per second.
    pub fn actual_rate(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.events_generated as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actual_rate() {
        let report = RunReport {
            events_generated: 50,
            elapsed: Duration::from_millis(500),
            ..Default::default()
        };
        assert!((report.actual_rate() - 100.0).abs() < 1e-9);
        assert_eq!(RunReport::default().actual_rate(), 0.0);
    }
}
