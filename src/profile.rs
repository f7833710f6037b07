//! # Scoring Profiles
//!
//! A profile is pure configuration: which signals count, how hard they are
//! compressed, which decay family applies, and which optional steps
//! (verified boost, quality filter, status penalties) are in play for one
//! content family. The composer branches on *data* from here, never on
//! content type — adding a content type means adding a profile.
//!
//! Profiles load from TOML (`config/profiles.toml` by default) with a
//! built-in seed used as fallback, mirroring the original production
//! constants for feed hot score, funding best score, recency feeds, and
//! comment ordering.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::decay::Decay;
use crate::error::ScoreError;
use crate::signals::{names, ContentKind};

// --- config path defaults & env names ---
pub const DEFAULT_PROFILES_CONFIG_PATH: &str = "config/profiles.toml";
pub const ENV_PROFILES_CONFIG_PATH: &str = "HOTRANK_PROFILES_PATH";

fn default_log_base() -> f64 {
    std::f64::consts::E
}

fn one() -> f64 {
    1.0
}

/// One (signal, weight, log base) entry in a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSpec {
    pub name: String,
    pub weight: f64,
    /// Log base for compression; natural log unless stated.
    #[serde(default = "default_log_base")]
    pub log_base: f64,
    /// Net-vote-like signals set this; everything else rejects negatives.
    #[serde(default)]
    pub allow_negative: bool,
    /// Extra multiplier applied to this component while the item carries an
    /// urgent bounty (new or expiring soon). 1.0 = no effect.
    #[serde(default = "one")]
    pub urgency_multiplier: f64,
}

impl SignalSpec {
    pub fn new(name: &str, weight: f64, log_base: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            log_base,
            allow_negative: false,
            urgency_multiplier: 1.0,
        }
    }
}

/// Flat engagement multiplier while the item is younger than the window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Freshness {
    pub multiplier: f64,
    pub window_hours: f64,
}

/// Flat subtractions that force active > expired > closed ordering for
/// funding items, regardless of engagement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusPenalties {
    pub expired: f64,
    pub closed: f64,
}

/// How decay enters the composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposeShape {
    /// `engagement * decay * scale` — decay modulates the whole aggregate.
    #[default]
    MultiplyDecay,
    /// `engagement / (age + base)^gravity * scale` — the gravity denominator
    /// is divided explicitly (funding/feed "best score" style).
    DivideDenominator,
}

/// Per-content-family scoring configuration. Static data, not behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub name: String,
    pub signals: Vec<SignalSpec>,
    pub decay: Decay,
    #[serde(default)]
    pub shape: ComposeShape,
    #[serde(default = "one")]
    pub scale: f64,
    /// Per-content-type multiplier on the engagement aggregate, applied
    /// before decay. Absent kinds read as 1.0.
    #[serde(default)]
    pub kind_weights: BTreeMap<ContentKind, f64>,
    /// Verified-author multiplier, applied after decay (verification
    /// amplifies engagement, it does not extend time decay).
    #[serde(default)]
    pub verified_boost: Option<f64>,
    /// Run the text quality filter as the last multiplicative step.
    #[serde(default)]
    pub quality_filter: bool,
    /// Explicit floor on the final score. Absent = negatives allowed.
    #[serde(default)]
    pub clamp_min: Option<f64>,
    #[serde(default)]
    pub freshness: Option<Freshness>,
    #[serde(default)]
    pub status_penalties: Option<StatusPenalties>,
}

impl ScoringProfile {
    /// Engagement multiplier for a content kind; 1.0 when unlisted.
    pub fn kind_weight(&self, kind: ContentKind) -> f64 {
        self.kind_weights.get(&kind).copied().unwrap_or(1.0)
    }

    /// Reject structurally unusable profiles at load time so compose can
    /// stay panic-free on the hot path.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            bail!("profile with empty name");
        }
        if self.signals.is_empty() {
            bail!("profile '{}' has no signals", self.name);
        }
        for s in &self.signals {
            if !s.weight.is_finite() || s.weight < 0.0 {
                bail!("profile '{}': signal '{}' has bad weight {}", self.name, s.name, s.weight);
            }
            if !s.log_base.is_finite() || s.log_base <= 1.0 {
                bail!("profile '{}': signal '{}' needs log_base > 1, got {}", self.name, s.name, s.log_base);
            }
            if !s.urgency_multiplier.is_finite() || s.urgency_multiplier <= 0.0 {
                bail!("profile '{}': signal '{}' has bad urgency multiplier", self.name, s.name);
            }
        }
        match self.decay {
            Decay::ExponentialHalfLife { half_life_hours } => {
                if !half_life_hours.is_finite() || half_life_hours <= 0.0 {
                    bail!("profile '{}': half_life_hours must be positive", self.name);
                }
            }
            Decay::GravityPower {
                base_hours,
                gravity,
            } => {
                if !base_hours.is_finite() || base_hours < 1.0 {
                    bail!("profile '{}': base_hours must be >= 1 to keep decay in (0, 1]", self.name);
                }
                if !gravity.is_finite() || gravity <= 0.0 {
                    bail!("profile '{}': gravity must be positive", self.name);
                }
            }
        }
        if self.shape == ComposeShape::DivideDenominator
            && !matches!(self.decay, Decay::GravityPower { .. })
        {
            bail!("profile '{}': divide_denominator shape requires gravity_power decay", self.name);
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            bail!("profile '{}': scale must be positive", self.name);
        }
        if let Some(b) = self.verified_boost {
            if !b.is_finite() || b < 1.0 {
                bail!("profile '{}': verified_boost must be >= 1", self.name);
            }
        }
        Ok(())
    }
}

/* ----------------------------
TOML schema
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
struct ProfilesRoot {
    #[serde(rename = "profile")]
    profiles: Vec<ScoringProfile>,
}

/// Named collection of profiles with seed fallback.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ScoringProfile>,
}

impl ProfileRegistry {
    /// Build a registry from explicit profiles, validating each and
    /// rejecting duplicate names.
    pub fn from_profiles(profiles: Vec<ScoringProfile>) -> anyhow::Result<Self> {
        let mut map = BTreeMap::new();
        for p in profiles {
            p.validate()?;
            if map.insert(p.name.clone(), p.clone()).is_some() {
                bail!("duplicate profile name '{}'", p.name);
            }
        }
        Ok(Self { profiles: map })
    }

    /// Load from a TOML file. Fails loudly — a malformed ranking config
    /// should never silently fall back in a batch job.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading profiles config {}", path.display()))?;
        let root: ProfilesRoot = toml::from_str(&raw)
            .with_context(|| format!("parsing profiles config {}", path.display()))?;
        Self::from_profiles(root.profiles)
    }

    /// Load from `$HOTRANK_PROFILES_PATH` or the default path; if neither
    /// file exists, use the built-in seed.
    pub fn load_or_seed() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_PROFILES_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_PROFILES_CONFIG_PATH.to_string());
        if Path::new(&path).exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default_seed())
        }
    }

    pub fn get(&self, name: &str) -> Result<&ScoringProfile, ScoreError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ScoreError::UnknownProfile(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Built-in profiles carrying the production constants.
    pub fn default_seed() -> Self {
        let e = std::f64::consts::E;

        let feed = ScoringProfile {
            name: "feed".into(),
            signals: vec![
                SignalSpec::new(names::UPVOTE, 15.0, e),
                SignalSpec::new(names::COMMENT, 25.0, e),
                SignalSpec::new(names::TIP, 20.0, e),
                SignalSpec {
                    urgency_multiplier: 2.0,
                    ..SignalSpec::new(names::BOUNTY, 15.0, e)
                },
                SignalSpec::new(names::PEER_REVIEW, 10.0, e),
                SignalSpec::new(names::ALTMETRIC, 5.0, e),
            ],
            decay: Decay::GravityPower {
                base_hours: 2.0,
                gravity: 1.2,
            },
            shape: ComposeShape::DivideDenominator,
            scale: 100.0,
            kind_weights: BTreeMap::from([
                (ContentKind::Paper, 1.2),
                (ContentKind::Post, 1.0),
                (ContentKind::Comment, 0.7),
            ]),
            verified_boost: None,
            quality_filter: false,
            clamp_min: None,
            freshness: Some(Freshness {
                multiplier: 4.5,
                window_hours: 48.0,
            }),
            status_penalties: None,
        };

        let funding = ScoringProfile {
            name: "funding".into(),
            signals: vec![
                SignalSpec::new(names::AMOUNT, 40.0, e),
                SignalSpec::new(names::APPLICANTS, 50.0, e),
                SignalSpec::new(names::COMMENT, 25.0, e),
                SignalSpec::new(names::UPVOTE, 15.0, e),
            ],
            decay: Decay::GravityPower {
                base_hours: 2.0,
                gravity: 1.2,
            },
            shape: ComposeShape::DivideDenominator,
            scale: 100.0,
            kind_weights: BTreeMap::new(),
            verified_boost: None,
            quality_filter: false,
            // Penalties intentionally push expired/closed below zero.
            clamp_min: None,
            freshness: None,
            status_penalties: Some(StatusPenalties {
                expired: 10_000.0,
                closed: 20_000.0,
            }),
        };

        let feed_recency = ScoringProfile {
            name: "feed_recency".into(),
            signals: vec![
                SignalSpec::new(names::UPVOTE, 1.0, 2.0),
                SignalSpec::new(names::COMMENT, 1.0, 2.0),
            ],
            decay: Decay::ExponentialHalfLife {
                half_life_hours: 72.0,
            },
            shape: ComposeShape::MultiplyDecay,
            scale: 1000.0,
            kind_weights: BTreeMap::new(),
            verified_boost: None,
            quality_filter: false,
            clamp_min: None,
            freshness: None,
            status_penalties: None,
        };

        let comment = ScoringProfile {
            name: "comment".into(),
            signals: vec![
                SignalSpec {
                    allow_negative: true,
                    ..SignalSpec::new(names::NET_VOTES, 1.0, 2.0)
                },
                SignalSpec::new(names::REPLY, 0.5, 2.0),
                SignalSpec::new(names::TIP, 0.25, e),
            ],
            decay: Decay::ExponentialHalfLife {
                half_life_hours: 720.0, // 30 days
            },
            shape: ComposeShape::MultiplyDecay,
            scale: 1000.0,
            kind_weights: BTreeMap::new(),
            verified_boost: Some(3.0),
            quality_filter: true,
            clamp_min: None,
            freshness: None,
            status_penalties: None,
        };

        Self::from_profiles(vec![feed, funding, feed_recency, comment])
            .expect("seed profiles are valid")
    }
}
