// src/lib.rs
// Public library surface for integration tests (and host processes that
// embed the engine instead of shelling out to the CLI).

pub mod batch;
pub mod compose;
pub mod compress;
pub mod decay;
pub mod error;
pub mod profile;
pub mod quality;
pub mod signals;

// ---- Re-exports for a stable public API ----
pub use batch::{BatchDriver, RecomputeStats, DEFAULT_BATCH_SIZE};
pub use compose::{compose, ScoreResult};
pub use decay::{age_hours, Decay, MIN_AGE_HOURS};
pub use error::ScoreError;
pub use profile::{
    ComposeShape, ProfileRegistry, ScoringProfile, SignalSpec, DEFAULT_PROFILES_CONFIG_PATH,
    ENV_PROFILES_CONFIG_PATH,
};
pub use signals::{ContentKind, FundingStatus, SignalSet};
