// tests/batch_recompute.rs
//
// Batch driver behavior through the public API: partial-failure tolerance,
// idempotence at a fixed `now`, and decay across reruns at a later `now`.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Duration, TimeZone, Utc};

use hotrank::{BatchDriver, ContentKind, ProfileRegistry, SignalSet};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn corpus_with_one_bad_record() -> Vec<(i64, SignalSet)> {
    let mut items: Vec<(i64, SignalSet)> = (0..100)
        .map(|i| {
            let set = SignalSet::new(ContentKind::Post, now() - Duration::hours(i % 48))
                .with_signal("upvote", (i * 3) as f64)
                .with_signal("comment", i as f64);
            (i, set)
        })
        .collect();
    // One malformed record among the valid ones.
    items[61].1.created_at = None;
    items
}

#[test]
fn one_bad_record_does_not_block_the_rest() {
    let reg = ProfileRegistry::default_seed();
    let profile = reg.get("feed_recency").unwrap();
    let cancel = AtomicBool::new(false);

    let mut written = BTreeMap::new();
    let stats = BatchDriver::new(16).recompute(
        corpus_with_one_bad_record(),
        profile,
        now(),
        &cancel,
        |id, r| {
            written.insert(*id, r.score);
            Ok(())
        },
    );

    assert_eq!(stats.processed, 100);
    assert_eq!(stats.succeeded, 99);
    assert_eq!(stats.failed, 1);
    assert_eq!(written.len(), 99);
    assert!(!written.contains_key(&61));
}

#[test]
fn immediate_rerun_persists_identical_scores() {
    let reg = ProfileRegistry::default_seed();
    let profile = reg.get("feed").unwrap();
    let cancel = AtomicBool::new(false);
    let driver = BatchDriver::new(10);

    let run = |store: &mut BTreeMap<i64, f64>| {
        driver.recompute(
            corpus_with_one_bad_record(),
            profile,
            now(),
            &cancel,
            |id, r| {
                store.insert(*id, r.score);
                Ok(())
            },
        )
    };

    let mut first = BTreeMap::new();
    let mut second = BTreeMap::new();
    run(&mut first);
    run(&mut second);
    assert_eq!(first, second);
}

#[test]
fn rerun_at_a_later_now_decays_scores() {
    let reg = ProfileRegistry::default_seed();
    let profile = reg.get("feed_recency").unwrap();
    let cancel = AtomicBool::new(false);
    let driver = BatchDriver::default();

    let corpus: Vec<(i64, SignalSet)> = (0..20)
        .map(|i| {
            let set = SignalSet::new(ContentKind::Post, now() - Duration::hours(2))
                .with_signal("upvote", (i + 1) as f64);
            (i, set)
        })
        .collect();

    let mut early = BTreeMap::new();
    driver.recompute(corpus.clone(), profile, now(), &cancel, |id, r| {
        early.insert(*id, r.score);
        Ok(())
    });

    let mut later = BTreeMap::new();
    driver.recompute(
        corpus,
        profile,
        now() + Duration::days(7),
        &cancel,
        |id, r| {
            later.insert(*id, r.score);
            Ok(())
        },
    );

    for (id, early_score) in &early {
        assert!(later[id] < *early_score, "item {id} did not decay");
    }
}
