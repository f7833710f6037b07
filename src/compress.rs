//! # Signal Compression
//!
//! Logarithmic compression of a raw counter into a bounded, comparable
//! component: `weight * log(raw + 1, base)`. The `+1` guarantees a defined,
//! zero result at `raw = 0`, and the log keeps runaway counters (mega-grants,
//! vote brigades) from dominating the aggregate.
//!
//! Negative input is sign-preserving — `-weight * log(|raw| + 1, base)` — so
//! net-vote style signals compress symmetrically. Signals that must never be
//! negative are rejected via [`compress_non_negative`].

use crate::error::ScoreError;

/// Compress a raw signal value. Sign-preserving for negative input.
///
/// Non-finite input (NaN/∞) is a contract violation, not a silent zero.
/// Monotonically non-decreasing in `raw` for any fixed `weight >= 0` and
/// `log_base > 1`.
pub fn compress(name: &str, raw: f64, weight: f64, log_base: f64) -> Result<f64, ScoreError> {
    if !raw.is_finite() {
        return Err(ScoreError::invalid_signal(name, raw));
    }
    let magnitude = (raw.abs() + 1.0).log(log_base) * weight;
    Ok(if raw < 0.0 { -magnitude } else { magnitude })
}

/// Compress a signal the profile declares non-negative. Negative input is
/// rejected (caller bug), never clamped.
pub fn compress_non_negative(
    name: &str,
    raw: f64,
    weight: f64,
    log_base: f64,
) -> Result<f64, ScoreError> {
    if raw < 0.0 {
        return Err(ScoreError::invalid_signal(name, raw));
    }
    compress(name, raw, weight, log_base)
}
