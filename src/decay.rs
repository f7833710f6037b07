//! # Time Decay
//!
//! Two decay families, selectable per profile and deliberately *not*
//! unified: funding and feed scores are independent scales.
//!
//! - [`Decay::ExponentialHalfLife`] — `exp(-ln(2)/half_life * age)`; smooth,
//!   recency-dominated falloff (comment ordering, recency feeds).
//! - [`Decay::GravityPower`] — `1 / (age + base)^gravity`; Hacker-News-style
//!   early visibility window (feed hot score, funding best score).
//!
//! Age is clamped to [`MIN_AGE_HOURS`] so clock skew and future-dated
//! records score as brand-new instead of blowing up the denominator. `now`
//! is always injected by the caller; nothing here reads a wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Floor for clamped age. Prevents division blow-up at age 0 and absorbs
/// small negative ages from clock skew.
pub const MIN_AGE_HOURS: f64 = 0.1;

/// Item age in hours, clamped to [`MIN_AGE_HOURS`].
pub fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let raw = (now - created_at).num_milliseconds() as f64 / 3_600_000.0;
    raw.max(MIN_AGE_HOURS)
}

/// A decay strategy plus its parameters. Profiles pick one; both return a
/// multiplier in `(0, 1]` for any clamped age (gravity assumes
/// `base_hours >= 1`, which every built-in profile satisfies).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Decay {
    ExponentialHalfLife { half_life_hours: f64 },
    GravityPower { base_hours: f64, gravity: f64 },
}

impl Decay {
    /// Decay multiplier for a clamped age.
    pub fn multiplier(&self, age_hours: f64) -> f64 {
        match *self {
            Decay::ExponentialHalfLife { half_life_hours } => {
                (-std::f64::consts::LN_2 / half_life_hours * age_hours).exp()
            }
            Decay::GravityPower { .. } => 1.0 / self.denominator(age_hours),
        }
    }

    /// Gravity denominator `(age + base)^gravity`, kept as an explicit
    /// division in ratio-shaped profiles to match the gravity-decay
    /// literature and avoid sign confusion with fractional gravity.
    /// For the exponential family this is simply `1 / multiplier`.
    pub fn denominator(&self, age_hours: f64) -> f64 {
        match *self {
            Decay::ExponentialHalfLife { .. } => 1.0 / self.multiplier(age_hours),
            Decay::GravityPower {
                base_hours,
                gravity,
            } => (age_hours + base_hours).powf(gravity),
        }
    }
}
