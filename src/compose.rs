//! # Score Composer
//!
//! Combines compressed signal components, content-type weighting, time
//! decay, and the profile's optional steps (freshness window, verified
//! boost, quality filter, status penalties) into one scalar score.
//!
//! Pure: for a fixed `(SignalSet, profile, now)` the result is the identical
//! float on every call — no wall clock, no I/O, no hidden state. Errors are
//! data-contract violations only; the batch driver catches them per item.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::compress::{compress, compress_non_negative};
use crate::decay::age_hours;
use crate::error::ScoreError;
use crate::profile::{ComposeShape, ScoringProfile};
use crate::quality;
use crate::signals::{FundingStatus, SignalSet};

/// Composed score plus a per-component breakdown for observability and
/// tests. Only the scalar is ever persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: BTreeMap<String, f64>,
}

/// Compose a score for one item under one profile at an injected `now`.
pub fn compose(
    set: &SignalSet,
    profile: &ScoringProfile,
    now: DateTime<Utc>,
) -> Result<ScoreResult, ScoreError> {
    let created_at = set.created_at.ok_or(ScoreError::MissingTimestamp)?;

    // Reject malformed counters up front, including ones the profile does
    // not read — a NaN in the bag is a broken record either way.
    for (name, value) in &set.values {
        if !value.is_finite() {
            return Err(ScoreError::invalid_signal(name, *value));
        }
    }

    let mut breakdown = BTreeMap::new();

    // 1) Compressed engagement components.
    let mut engagement = 0.0;
    for spec in &profile.signals {
        let raw = set.signal(&spec.name);
        let mut component = if spec.allow_negative {
            compress(&spec.name, raw, spec.weight, spec.log_base)?
        } else {
            compress_non_negative(&spec.name, raw, spec.weight, spec.log_base)?
        };
        if set.urgent_bounty && spec.urgency_multiplier != 1.0 {
            component *= spec.urgency_multiplier;
        }
        breakdown.insert(spec.name.clone(), component);
        engagement += component;
    }

    // 2) Content-type weighting, applied to the aggregate before decay.
    let kind_weight = profile.kind_weight(set.kind);
    engagement *= kind_weight;
    breakdown.insert("kind_weight".into(), kind_weight);

    // 3) Freshness window (feed profile): flat boost while young.
    let age = age_hours(created_at, now);
    let freshness = match profile.freshness {
        Some(f) if age < f.window_hours => f.multiplier,
        _ => 1.0,
    };
    engagement *= freshness;
    breakdown.insert("freshness_multiplier".into(), freshness);
    breakdown.insert("engagement_score".into(), engagement);

    // 4) Decay, in the profile's composition shape.
    let mut score = match profile.shape {
        ComposeShape::MultiplyDecay => {
            let decay = profile.decay.multiplier(age);
            breakdown.insert("decay_multiplier".into(), decay);
            engagement * decay
        }
        ComposeShape::DivideDenominator => {
            let denominator = profile.decay.denominator(age);
            breakdown.insert("time_denominator".into(), denominator);
            engagement / denominator
        }
    };

    // 5) Verified boost after decay: verification amplifies engagement, it
    // does not extend time decay.
    if let (Some(boost), true) = (profile.verified_boost, set.verified_author) {
        score *= boost;
        breakdown.insert("verified_boost".into(), boost);
    }

    score *= profile.scale;

    // 6) Status penalties (funding): flat subtraction after scaling.
    if let (Some(penalties), Some(status)) = (profile.status_penalties, set.status) {
        let penalty = match status {
            FundingStatus::Active => 0.0,
            FundingStatus::Expired => penalties.expired,
            FundingStatus::Closed => penalties.closed,
        };
        if penalty != 0.0 {
            score -= penalty;
            breakdown.insert("status_penalty".into(), penalty);
        }
    }

    // 7) Quality filter last, on the fully composed score.
    if profile.quality_filter {
        let text = set.text.as_deref().unwrap_or("");
        let penalized = quality::apply_penalty(score, text);
        if penalized != score {
            breakdown.insert("quality_penalty".into(), quality::QUALITY_PENALTY);
            score = penalized;
        }
    }

    // Negative scores are legitimate (net downvotes, status penalties)
    // unless the profile clamps explicitly.
    if let Some(floor) = profile.clamp_min {
        score = score.max(floor);
    }

    Ok(ScoreResult { score, breakdown })
}
