//! Individual value generators used by the locale provider.
//!
//! Each generator draws from the RNG it is handed, so output is
//! reproducible for a fixed seed.

pub mod locale;
pub mod numeric;
pub mod pattern;
pub mod timestamp;
pub mod uuid;
