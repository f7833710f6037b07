//! # Ranking Batch Driver
//!
//! Walks a corpus of `(item_id, SignalSet)` pairs in fixed-size pages,
//! composes a score per item, and hands the scalar to a caller-supplied
//! write callback. Per-item failures are logged, counted, and skipped —
//! corpora are large and one malformed record must not block the rest.
//!
//! The driver owns no storage and no scheduling. It checks a cancellation
//! flag between pages; a single item's compose call is constant-time
//! arithmetic, so nothing finer is needed. Re-running with the same `now`
//! is idempotent; re-running later shifts scores via decay, which is the
//! point of periodic recomputation.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, info, warn};

use crate::compose::{compose, ScoreResult};
use crate::profile::ScoringProfile;
use crate::signals::SignalSet;

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Outcome counters for one recompute run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputeStats {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RecomputeStats {
    fn new() -> Self {
        Self {
            processed: 0,
            succeeded: 0,
            failed: 0,
            cancelled: false,
            elapsed: Duration::ZERO,
        }
    }
}

/// Batch recomputation over a lazily supplied corpus.
#[derive(Debug, Clone)]
pub struct BatchDriver {
    batch_size: usize,
    dry_run: bool,
}

impl BatchDriver {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            dry_run: false,
        }
    }

    /// Compute but never invoke the write callback.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Score every item in `corpus` under `profile` at the injected `now`,
    /// handing each result to `write`; collaborators persist the scalar
    /// (the breakdown is observability-only). Checks `cancel` between
    /// pages. Any error from compose or from the write callback is a
    /// per-item failure, not a batch abort.
    pub fn recompute<Id, I, W>(
        &self,
        corpus: I,
        profile: &ScoringProfile,
        now: DateTime<Utc>,
        cancel: &AtomicBool,
        mut write: W,
    ) -> RecomputeStats
    where
        Id: Display,
        I: IntoIterator<Item = (Id, SignalSet)>,
        W: FnMut(&Id, &ScoreResult) -> anyhow::Result<()>,
    {
        let started = Instant::now();
        let mut stats = RecomputeStats::new();
        let mut iter = corpus.into_iter();
        let mut page_index: u64 = 0;

        'pages: loop {
            if cancel.load(Ordering::Relaxed) {
                stats.cancelled = true;
                info!(
                    profile = %profile.name,
                    pages = page_index,
                    "recompute cancelled between pages"
                );
                break;
            }

            let mut page_len = 0usize;
            for (id, set) in iter.by_ref().take(self.batch_size) {
                page_len += 1;
                stats.processed += 1;
                counter!("hotrank_items_processed_total").increment(1);

                let outcome = compose(&set, profile, now)
                    .map_err(anyhow::Error::from)
                    .and_then(|result| {
                        if !self.dry_run {
                            write(&id, &result)?;
                        }
                        Ok(result)
                    });

                match outcome {
                    Ok(result) => {
                        stats.succeeded += 1;
                        debug!(item = %id, score = result.score, "scored");
                    }
                    Err(err) => {
                        stats.failed += 1;
                        counter!("hotrank_items_failed_total").increment(1);
                        warn!(item = %id, error = %err, "scoring failed; continuing");
                    }
                }
            }

            if page_len < self.batch_size {
                break 'pages; // corpus exhausted
            }
            page_index += 1;
        }

        stats.elapsed = started.elapsed();
        info!(
            profile = %profile.name,
            processed = stats.processed,
            succeeded = stats.succeeded,
            failed = stats.failed,
            cancelled = stats.cancelled,
            dry_run = self.dry_run,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "recompute finished"
        );
        stats
    }
}

impl Default for BatchDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
