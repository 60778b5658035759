//! Answer grading.
//!
//! Evaluates free-text answers against the canonical English word and its
//! synonyms, with tolerance for plural slips and single-keystroke typos,
//! and appends the resulting trace records.

use glossa_algo::{edit_distance, similarity};
use serde::{Deserialize, Serialize};

use crate::models::{LearningUnit, SessionId, TraceRecord, UnitId};
use crate::store::LearningStore;

#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub unit_id: UnitId,
    pub user_english: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub unit_id: UnitId,
    /// The English form the answer was graded against (canonical word or
    /// the closest synonym).
    pub true_english: String,
    pub correct: bool,
    pub typo: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub results: Vec<AnswerResult>,
    /// Answers referencing units the catalog does not know; graded as
    /// nothing, reported per entry.
    pub not_found_unit_ids: Vec<UnitId>,
}

/// Grades a batch of answers for a test session.
///
/// Stamps the session's end time, then per answer: picks the accepted
/// English form, evaluates it, and appends one trace record extending the
/// user's latest record for the unit (`seen+1`, `tested+1`, `correct`
/// conditionally; `interacted` unchanged). A unit the user has never traced
/// gets a result but no record - there is no baseline to extend.
pub async fn grade_answers(
    store: &LearningStore,
    session_id: SessionId,
    answers: &[SubmittedAnswer],
) -> Result<GradeReport, GradeError> {
    let mut inner = store.write().await;

    let session = inner
        .session(session_id)
        .cloned()
        .ok_or(GradeError::SessionNotFound(session_id))?;
    inner.end_session(session_id);

    let mut results = Vec::with_capacity(answers.len());
    let mut not_found_unit_ids = Vec::new();

    for answer in answers {
        let Some(unit) = inner.unit(answer.unit_id).cloned() else {
            not_found_unit_ids.push(answer.unit_id);
            continue;
        };

        let (true_english, correct, typo) = evaluate(&unit, &answer.user_english);
        results.push(AnswerResult {
            unit_id: unit.id,
            true_english,
            correct,
            typo,
        });

        // Extend the chain; skip units with no prior trace.
        let Some(prev) = inner.latest_for_user_unit(&session.user_id, unit.id).cloned() else {
            continue;
        };
        let mut record = TraceRecord::new(&session, unit.id, Some(&prev));
        record.seen += 1;
        record.tested += 1;
        if correct {
            record.correct += 1;
        }
        inner.push_record(record);
    }

    Ok(GradeReport {
        results,
        not_found_unit_ids,
    })
}

/// Grades one answer against a unit. Returns (accepted form, correct, typo).
fn evaluate(unit: &LearningUnit, raw_answer: &str) -> (String, bool, bool) {
    let answer = raw_answer.to_lowercase();

    // Accepted form: the canonical word, unless a synonym resembles the
    // answer more. Ties keep the canonical word.
    let mut accepted = unit.english_word.to_lowercase();
    if !unit.synonyms.is_empty() {
        let mut best = similarity(&answer, &accepted);
        for synonym in &unit.synonyms {
            let candidate = synonym.to_lowercase();
            let sim = similarity(&answer, &candidate);
            if sim > best {
                best = sim;
                accepted = candidate;
            }
        }
    }

    let mut correct = answer == accepted;
    let mut typo = false;

    // Plural slips: a single trailing 's' either way. Some foreign words
    // (e.g. Swedish "djur") are the same in singular and plural.
    if format!("{accepted}s") == answer || format!("{answer}s") == accepted {
        correct = true;
        typo = true;
    }

    // One accidental insertion, deletion, substitution or transposition.
    if edit_distance(&answer, &accepted) == 1 {
        correct = true;
        typo = true;
    }

    (accepted, correct, typo)
}
