// tests/compose_scenarios.rs
//
// End-to-end scoring scenarios against the public API: the documented
// feed-recency example, decay monotonicity for both families, and
// randomized signal monotonicity.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;

use hotrank::{
    compose, ComposeShape, ContentKind, Decay, ProfileRegistry, ScoringProfile, SignalSet,
    SignalSpec,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Minimal exponential profile with unit scale, for checking raw numbers.
fn recency_log2_profile() -> ScoringProfile {
    ScoringProfile {
        name: "recency_log2".into(),
        signals: vec![
            SignalSpec {
                allow_negative: true,
                ..SignalSpec::new("net_votes", 1.0, 2.0)
            },
            SignalSpec::new("comment_count", 1.0, 2.0),
        ],
        decay: Decay::ExponentialHalfLife {
            half_life_hours: 72.0,
        },
        shape: ComposeShape::MultiplyDecay,
        scale: 1.0,
        kind_weights: Default::default(),
        verified_boost: None,
        quality_filter: false,
        clamp_min: None,
        freshness: None,
        status_penalties: None,
    }
}

#[test]
fn documented_feed_recency_example() {
    // {net_votes: 10, comment_count: 5}, one hour old, 72h half-life:
    //   engagement = log2(11) + log2(6) ≈ 6.044
    //   decay      = exp(-ln 2 / 72)    ≈ 0.9904
    let now = t0();
    let set = SignalSet::new(ContentKind::Post, now - Duration::hours(1))
        .with_signal("net_votes", 10.0)
        .with_signal("comment_count", 5.0);

    let result = compose(&set, &recency_log2_profile(), now).unwrap();

    let engagement = 11.0_f64.log2() + 6.0_f64.log2();
    let decay = (-std::f64::consts::LN_2 / 72.0).exp();
    assert!((engagement - 6.044394).abs() < 1e-6);
    assert!((decay - 0.990419).abs() < 1e-6);
    assert!((result.score - engagement * decay).abs() < 1e-9);
    assert!((result.breakdown["engagement_score"] - engagement).abs() < 1e-9);
    assert!((result.breakdown["decay_multiplier"] - decay).abs() < 1e-9);
}

#[test]
fn older_content_never_outscores_newer_for_both_decay_families() {
    let reg = ProfileRegistry::default_seed();
    let now = t0();

    for profile_name in ["feed_recency", "funding"] {
        let profile = reg.get(profile_name).unwrap();
        let mut prev = f64::INFINITY;
        for age_hours in [0, 1, 6, 24, 72, 240, 2000] {
            let set = SignalSet::new(ContentKind::Post, now - Duration::hours(age_hours))
                .with_signal("upvote", 40.0)
                .with_signal("comment", 12.0)
                .with_signal("amount", 5_000.0)
                .with_signal("applicants", 8.0);
            let score = compose(&set, profile, now).unwrap().score;
            assert!(
                score <= prev,
                "{profile_name}: score rose with age at {age_hours}h"
            );
            prev = score;
        }
    }
}

#[test]
fn aging_the_clock_never_raises_a_score() {
    // Same item, recomputed at later `now` values — periodic recomputation
    // must only let scores fall (non-negative engagement).
    let reg = ProfileRegistry::default_seed();
    let profile = reg.get("feed_recency").unwrap();
    let set = SignalSet::new(ContentKind::Post, t0())
        .with_signal("upvote", 25.0)
        .with_signal("comment", 6.0);

    let mut prev = f64::INFINITY;
    for days in 0..10 {
        let score = compose(&set, profile, t0() + Duration::days(days))
            .unwrap()
            .score;
        assert!(score <= prev);
        prev = score;
    }
}

#[test]
fn raising_any_signal_never_lowers_engagement() {
    let reg = ProfileRegistry::default_seed();
    let profile = reg.get("feed").unwrap();
    let now = t0();
    let mut rng = rand::rng();

    for _ in 0..50 {
        let base: Vec<(String, f64)> = profile
            .signals
            .iter()
            .map(|s| (s.name.clone(), rng.random_range(0.0..500.0)))
            .collect();
        let mut set = SignalSet::new(ContentKind::Post, now - Duration::hours(5));
        for (name, v) in &base {
            set = set.with_signal(name, *v);
        }
        let before = compose(&set, profile, now).unwrap().breakdown["engagement_score"];

        // Bump one signal, leave the rest fixed.
        let which = rng.random_range(0..base.len());
        let bumped = set.clone().with_signal(
            &base[which].0,
            base[which].1 + rng.random_range(0.0..100.0),
        );
        let after = compose(&bumped, profile, now).unwrap().breakdown["engagement_score"];
        assert!(
            after >= before,
            "bumping '{}' lowered engagement",
            base[which].0
        );
    }
}

#[test]
fn zero_signals_at_creation_time_score_zero() {
    let reg = ProfileRegistry::default_seed();
    let now = t0();
    for name in ["feed", "funding", "feed_recency"] {
        let profile = reg.get(name).unwrap();
        let set = SignalSet::new(ContentKind::Post, now);
        let result = compose(&set, profile, now).unwrap();
        assert_eq!(result.score, 0.0, "profile {name}");
    }
}
