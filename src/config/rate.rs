//! Rate parsing utilities.

use anyhow::Context;
use event_stream::Rate;

/// Parse a rate string like "100", "100/s", "30/m", "unlimited" into a [`Rate`].
/// Supports:
/// - `unlimited` (any case): no pacing
/// - Plain numbers (interpreted as events per second): "2.5"
/// - Per-second suffix: "100/s"
/// - Per-minute suffix: "30/m"
/// - Per-hour suffix: "3600/h"
pub fn parse_rate(s: &str) -> anyhow::Result<Rate> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty rate string");
    }
    if s.eq_ignore_ascii_case("unlimited") {
        return Ok(Rate::Unlimited);
    }

    let (num_str, seconds) = if let Some(num_str) = s.strip_suffix("/h") {
        (num_str, 3600.0)
    } else if let Some(num_str) = s.strip_suffix("/m") {
        (num_str, 60.0)
    } else if let Some(num_str) = s.strip_suffix("/s") {
        (num_str, 1.0)
    } else {
        (s, 1.0)
    };

    let events: f64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid rate value: {num_str}"))?;
    Ok(Rate::per_second(events / seconds)?)
}
