//! Numeric value generators bounded by `minimum`/`maximum`.

use crate::error::ProviderError;
use rand::Rng;

/// Span used when only one bound (or neither) is declared.
const DEFAULT_SPAN: f64 = 100.0;

/// 2^63, the first float above every `i64`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Fill in missing bounds around the declared ones.
fn bounds(minimum: Option<f64>, maximum: Option<f64>) -> (f64, f64) {
    match (minimum, maximum) {
        (Some(lo), Some(hi)) => (lo, hi),
        (Some(lo), None) => (lo, lo + DEFAULT_SPAN),
        (None, Some(hi)) => (hi - DEFAULT_SPAN, hi),
        (None, None) => (0.0, DEFAULT_SPAN),
    }
}

/// Generate a random integer within the (inclusive) bounds.
pub fn generate_int_range<R: Rng>(
    rng: &mut R,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<i64, ProviderError> {
    let (lo, hi) = bounds(minimum, maximum);
    let (lo_ceil, hi_floor) = (lo.ceil(), hi.floor());
    if lo_ceil > hi_floor {
        return Err(ProviderError::EmptyRange {
            minimum: lo,
            maximum: hi,
        });
    }
    if lo_ceil >= I64_LIMIT || hi_floor < -I64_LIMIT {
        return Err(ProviderError::IntegerOverflow {
            minimum: lo,
            maximum: hi,
        });
    }
    // Casts saturate, which keeps a partially overlapping range inside [lo, hi]
    Ok(rng.random_range(lo_ceil as i64..=hi_floor as i64))
}

/// Generate a random float within the (inclusive) bounds, rounded to two
/// decimal places.
pub fn generate_float_range<R: Rng>(
    rng: &mut R,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<f64, ProviderError> {
    let (lo, hi) = bounds(minimum, maximum);
    if lo > hi {
        return Err(ProviderError::EmptyRange {
            minimum: lo,
            maximum: hi,
        });
    }
    // Interpolate rather than scale by `hi - lo`, which overflows for
    // bounds near f64::MAX
    let t: f64 = rng.random();
    let value = lo * (1.0 - t) + hi * t;
    let scaled = value * 100.0;
    let rounded = if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    };
    // Rounding may step outside a narrow range
    Ok(rounded.clamp(lo, hi))
}
