//! End-to-end engine behavior over the public service API: carry-forward
//! chains, composition preconditions, and grading side effects.

use std::time::Duration;

use glossa_backend::models::{SessionType, TrackMode};
use glossa_backend::services::composer::{self, ComposeError};
use glossa_backend::services::grader::{self, SubmittedAnswer};
use glossa_backend::services::ingest;

mod common;

#[tokio::test]
async fn seen_then_interacted_round_trip_builds_a_two_link_chain() {
    let (store, units) = common::seeded_store().await;
    let dog = units.iter().find(|u| u.english_word == "dog").unwrap();

    let first = store
        .start_session("u1", "sv", SessionType::Read)
        .await
        .unwrap();
    ingest::ingest(&store, first.id, &[dog.id], TrackMode::Seen)
        .await
        .unwrap();

    // Real elapsed time between the two session starts is the delta basis.
    tokio::time::sleep(Duration::from_millis(1200)).await;

    let second = store
        .start_session("u1", "sv", SessionType::Read)
        .await
        .unwrap();
    ingest::ingest(&store, second.id, &[dog.id], TrackMode::Interacted)
        .await
        .unwrap();

    let chain = store.chain("u1", dog.id).await;
    assert_eq!(chain.len(), 2);

    let head = &chain[1];
    assert_eq!(head.prev, Some(chain[0].id));
    assert_eq!(head.seen, 1, "seen carried forward");
    assert_eq!(head.interacted, 1);
    assert_eq!(head.tested, 0);

    let expected = (second.start_time - first.start_time).num_seconds();
    assert_eq!(store.delta_secs(head).await, expected);
    assert!(expected >= 1);
    assert_eq!(store.delta_secs(&chain[0]).await, 0);
}

#[tokio::test]
async fn ingesting_the_same_batch_twice_doubles_the_increment() {
    let (store, units) = common::seeded_store().await;
    let cat = units.iter().find(|u| u.english_word == "cat").unwrap();
    let session = store
        .start_session("u1", "sv", SessionType::Read)
        .await
        .unwrap();
    let batch = [cat.id, cat.id, cat.id];

    ingest::ingest(&store, session.id, &batch, TrackMode::Seen)
        .await
        .unwrap();
    ingest::ingest(&store, session.id, &batch, TrackMode::Seen)
        .await
        .unwrap();

    let record = store.latest_record("u1", cat.id).await.unwrap();
    assert_eq!(record.seen, 6);
}

#[tokio::test]
async fn composition_requires_enough_distinct_traced_words() {
    let (store, units) = common::seeded_store().await;
    let scorer = common::test_scorer();
    let session = store
        .start_session("u1", "sv", SessionType::Read)
        .await
        .unwrap();

    // Trace only five of the eight words.
    let five: Vec<_> = units.iter().take(5).map(|u| u.id).collect();
    ingest::ingest(&store, session.id, &five, TrackMode::Seen)
        .await
        .unwrap();

    let err = composer::compose_test(&store, &scorer, "u1", "sv", 7)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ComposeError::InsufficientCandidates { have: 5, need: 7 }
    ));

    // Trace the rest; composition now yields 7 distinct units.
    let rest: Vec<_> = units.iter().skip(5).map(|u| u.id).collect();
    ingest::ingest(&store, session.id, &rest, TrackMode::Seen)
        .await
        .unwrap();

    let picked = composer::compose_test(&store, &scorer, "u1", "sv", 7)
        .await
        .unwrap();
    assert_eq!(picked.len(), 7);
    let mut ids: Vec<_> = picked.iter().map(|u| u.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 7);
}

#[tokio::test]
async fn grading_extends_chains_and_closes_the_session() {
    let (store, units) = common::seeded_store().await;
    let dog = units.iter().find(|u| u.english_word == "dog").unwrap();
    let cat = units.iter().find(|u| u.english_word == "cat").unwrap();

    let read = store
        .start_session("u1", "sv", SessionType::Read)
        .await
        .unwrap();
    ingest::ingest(&store, read.id, &[dog.id, cat.id], TrackMode::Seen)
        .await
        .unwrap();

    let test = store
        .start_session("u1", "sv", SessionType::Test)
        .await
        .unwrap();
    let report = grader::grade_answers(
        &store,
        test.id,
        &[
            SubmittedAnswer {
                unit_id: dog.id,
                user_english: "dog".to_string(),
            },
            SubmittedAnswer {
                unit_id: cat.id,
                user_english: "dig".to_string(),
            },
        ],
    )
    .await
    .unwrap();

    assert!(report.results[0].correct);
    assert!(!report.results[0].typo);
    assert!(!report.results[1].correct, "dig is two edits from cat");

    let dog_head = store.latest_record("u1", dog.id).await.unwrap();
    assert_eq!((dog_head.tested, dog_head.correct), (1, 1));
    let cat_head = store.latest_record("u1", cat.id).await.unwrap();
    assert_eq!((cat_head.tested, cat_head.correct), (1, 0));

    assert!(store.session(test.id).await.unwrap().end_time.is_some());
}
