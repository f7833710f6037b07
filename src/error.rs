//! Error taxonomy for the scoring engine.
//!
//! Composition never fails for valid numeric input; these errors mark
//! data-contract violations that the batch driver catches per item.
//! Retrying is the scheduler's concern, not ours — a record that fails
//! here will fail the same way until its data is fixed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// A signal carried a non-finite value, or a negative value for a
    /// signal the profile declares non-negative. Never silently coerced —
    /// a clamp here would hide caller bugs.
    #[error("invalid signal '{name}': {value}")]
    InvalidSignal { name: String, value: f64 },

    /// The item has no creation timestamp; decay is undefined without one.
    #[error("missing created_at timestamp")]
    MissingTimestamp,

    /// Profile lookup by name failed (CLI/registry edge).
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}

impl ScoreError {
    pub fn invalid_signal(name: &str, value: f64) -> Self {
        Self::InvalidSignal {
            name: name.to_string(),
            value,
        }
    }
}
