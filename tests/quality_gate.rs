// tests/quality_gate.rs
//
// Comment-profile quality gate: spam text is attenuated to at most 10% of
// its unpenalized score, substantive text is untouched, and the verified
// boost stacks with (not against) the gate.

use chrono::{DateTime, Duration, TimeZone, Utc};

use hotrank::{compose, ContentKind, ProfileRegistry, SignalSet};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn comment(text: &str) -> SignalSet {
    SignalSet::new(ContentKind::Comment, now() - Duration::hours(4))
        .with_signal("net_votes", 12.0)
        .with_signal("reply", 3.0)
        .with_text(text)
}

#[test]
fn spam_comment_scores_at_most_ten_percent() {
    let reg = ProfileRegistry::default_seed();
    let gated = reg.get("comment").unwrap();
    let mut ungated = gated.clone();
    ungated.quality_filter = false;

    let spam = comment("asdfasdf");
    let penalized = compose(&spam, gated, now()).unwrap().score;
    let unpenalized = compose(&spam, &ungated, now()).unwrap().score;

    assert!(penalized > 0.0);
    assert!(penalized <= unpenalized * 0.1 + 1e-9);
    assert!((penalized - unpenalized * 0.1).abs() < 1e-9);
}

#[test]
fn substantive_comment_is_not_penalized() {
    let reg = ProfileRegistry::default_seed();
    let gated = reg.get("comment").unwrap();
    let mut ungated = gated.clone();
    ungated.quality_filter = false;

    let text =
        "The regression in figure 3 omits the replication cohort, which changes the effect size.";
    let a = compose(&comment(text), gated, now()).unwrap().score;
    let b = compose(&comment(text), &ungated, now()).unwrap().score;
    assert_eq!(a, b);
}

#[test]
fn missing_text_is_treated_as_low_quality() {
    let reg = ProfileRegistry::default_seed();
    let gated = reg.get("comment").unwrap();

    let mut no_text = comment("placeholder ignored");
    no_text.text = None;
    let mut with_text = comment(
        "A concrete counterexample: the 2019 dataset already includes the corrected baseline.",
    );
    with_text.values = no_text.values.clone();

    let a = compose(&no_text, gated, now()).unwrap().score;
    let b = compose(&with_text, gated, now()).unwrap().score;
    assert!((a - b * 0.1).abs() < 1e-9);
}

#[test]
fn verified_boost_applies_before_the_gate() {
    // A verified author's spam is still spam: boost ×3, then penalty ×0.1.
    let reg = ProfileRegistry::default_seed();
    let gated = reg.get("comment").unwrap();

    let plain = comment("asdfasdf");
    let boosted = plain.clone().verified();
    let a = compose(&plain, gated, now()).unwrap().score;
    let b = compose(&boosted, gated, now()).unwrap().score;
    assert!((b / a - 3.0).abs() < 1e-9);
}
