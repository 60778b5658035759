//! Test composition.
//!
//! Picks the words for a test session in two phases over the user's latest
//! trace per unit: half the test targets words the scorer predicts the user
//! will miss (reinforcement), the rest targets the most recently seen words
//! (short-term retention).

use std::cmp::Ordering;

use glossa_algo::{RecallScorer, ScorerError, TraceFeatures};
use serde::Serialize;

use crate::models::LearningUnit;
use crate::store::LearningStore;

/// Default number of words in a composed test.
pub const DEFAULT_TEST_WORDS: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("language not found: {0}")]
    LanguageNotFound(String),
    /// A normal outcome, not a fault: the user has not traced enough
    /// distinct words yet.
    #[error("only {have} of {need} required words have been traced")]
    InsufficientCandidates { have: usize, need: usize },
    /// A candidate's readable word is outside the scorer vocabulary.
    /// Fatal for this composition attempt, never silently degraded.
    #[error(transparent)]
    Scorer(#[from] ScorerError),
}

/// Pre-test eligibility summary (the data behind a progress message).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub words_traced: usize,
    pub words_required: usize,
    pub eligible: bool,
}

struct Candidate {
    unit: LearningUnit,
    score: f64,
    delta_secs: i64,
}

/// How many distinct traced words the user has in the language, against
/// the required test size.
pub async fn eligibility(
    store: &LearningStore,
    user_id: &str,
    language_key: &str,
) -> Result<Eligibility, ComposeError> {
    if store.language(language_key).await.is_none() {
        return Err(ComposeError::LanguageNotFound(language_key.to_string()));
    }
    let words_traced = store.distinct_traced_units(user_id, language_key).await;
    Ok(Eligibility {
        words_traced,
        words_required: DEFAULT_TEST_WORDS,
        eligible: words_traced >= DEFAULT_TEST_WORDS,
    })
}

/// Composes an ordered, duplicate-free set of `total` units for a test.
///
/// Candidates are the user's most recent trace per distinct unit in the
/// language. Phase one takes the `total / 2` lowest-scored words out of the
/// pool; phase two takes the remaining slots from the pool by ascending
/// delta (most recently seen first). The halves are disjoint by
/// construction.
pub async fn compose_test(
    store: &LearningStore,
    scorer: &RecallScorer,
    user_id: &str,
    language_key: &str,
    total: usize,
) -> Result<Vec<LearningUnit>, ComposeError> {
    let inner = store.read().await;

    let language = inner
        .language(language_key)
        .cloned()
        .ok_or_else(|| ComposeError::LanguageNotFound(language_key.to_string()))?;

    let latest = inner.unique_latest(user_id, language_key);
    if latest.len() < total {
        return Err(ComposeError::InsufficientCandidates {
            have: latest.len(),
            need: total,
        });
    }

    let mut candidates = Vec::with_capacity(latest.len());
    for record in latest {
        let Some(unit) = inner.unit(record.unit_id) else {
            continue;
        };
        let delta_secs = inner.delta_secs(record);
        let features = TraceFeatures {
            readable_word: unit.readable_word(&language).to_string(),
            delta_secs: delta_secs as f64,
            seen: record.seen,
            interacted: record.interacted,
            tested: record.tested,
            correct: record.correct,
        };
        let score = scorer.score(&features)?;
        candidates.push(Candidate {
            unit: unit.clone(),
            score,
            delta_secs,
        });
    }

    // Phase one: lowest predicted recall, removed from the pool.
    let weak_count = total / 2;
    candidates.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
    let mut picked: Vec<LearningUnit> = candidates
        .drain(..weak_count)
        .map(|c| c.unit)
        .collect();

    // Phase two: most recently seen among the remainder.
    candidates.sort_by_key(|c| c.delta_secs);
    picked.extend(candidates.drain(..total - weak_count).map(|c| c.unit));

    Ok(picked)
}
