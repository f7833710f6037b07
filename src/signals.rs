//! # Signal Sets
//!
//! A `SignalSet` is the immutable bag of raw engagement counters for one
//! item and one scoring pass: vote totals, comment counts, tip/bounty/funding
//! amounts, applicant counts, plus the creation timestamp and a handful of
//! boolean/status facts the profiles key off. It is built fresh for every
//! pass by the caller (the content repository collaborator) and never cached
//! across calls.
//!
//! Counter semantics: `net_votes` may be negative (upvotes minus downvotes);
//! every other seed signal is non-negative by contract, enforced at compose
//! time per profile.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical signal names used by the built-in profiles.
pub mod names {
    pub const UPVOTE: &str = "upvote";
    pub const NET_VOTES: &str = "net_votes";
    pub const COMMENT: &str = "comment";
    pub const REPLY: &str = "reply";
    pub const TIP: &str = "tip";
    pub const BOUNTY: &str = "bounty";
    pub const PEER_REVIEW: &str = "peer_review";
    pub const ALTMETRIC: &str = "altmetric";
    pub const AMOUNT: &str = "amount";
    pub const APPLICANTS: &str = "applicants";
}

/// Content type of the scored item. New kinds are added here and given a
/// weight in profile data — never by branching engine code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentKind {
    Paper,
    Post,
    Comment,
    Grant,
    Fundraise,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Paper => "PAPER",
            ContentKind::Post => "POST",
            ContentKind::Comment => "COMMENT",
            ContentKind::Grant => "GRANT",
            ContentKind::Fundraise => "FUNDRAISE",
        }
    }
}

/// Lifecycle status for funding items (grants/fundraises). Profiles may
/// attach flat penalties so active items always outrank expired and closed
/// ones regardless of engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FundingStatus {
    Active,
    Expired,
    Closed,
}

/// Raw per-item counters for a single scoring pass.
///
/// Treat as immutable once built. `values` maps signal name → raw count;
/// missing names read as 0. `created_at` is optional only so malformed
/// records can be represented — compose rejects `None` with
/// `MissingTimestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSet {
    pub kind: ContentKind,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
    /// Item carries an open bounty that is new or expiring soon.
    #[serde(default)]
    pub urgent_bounty: bool,
    /// Author has a verified account (comment profile boost).
    #[serde(default)]
    pub verified_author: bool,
    /// Funding lifecycle status, when applicable.
    #[serde(default)]
    pub status: Option<FundingStatus>,
    /// Text body, consulted only by the quality filter (comments).
    #[serde(default)]
    pub text: Option<String>,
}

impl SignalSet {
    pub fn new(kind: ContentKind, created_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            created_at: Some(created_at),
            values: BTreeMap::new(),
            urgent_bounty: false,
            verified_author: false,
            status: None,
            text: None,
        }
    }

    /// Raw value for a signal name; absent signals read as 0.
    pub fn signal(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn with_signal(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_status(mut self, status: FundingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified_author = true;
        self
    }

    pub fn urgent(mut self) -> Self {
        self.urgent_bounty = true;
        self
    }
}
