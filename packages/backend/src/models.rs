//! Domain types for the learning-record engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UnitId = Uuid;
pub type SessionId = Uuid;
pub type TraceId = Uuid;

/// A supported target language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignLanguage {
    /// ISO-639-1 code, e.g. `sv`, `ru`, `ja`.
    pub key: String,
    pub english_name: String,
    /// False for languages rendered in a non-Latin script (Cyrillic, Kana...).
    pub uses_latin_script: bool,
}

/// One translation pairing: an English word and its rendering in a target
/// language. Immutable once registered, apart from the rendering text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningUnit {
    pub id: UnitId,
    pub english_word: String,
    pub foreign_word: String,
    /// Phonetic rendering, used when the target script is non-Latin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    pub language_key: String,
    /// Accepted alternative English forms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

impl LearningUnit {
    /// The rendering actually shown and tested: the pronunciation when one
    /// exists and the language is non-Latin-script, else the foreign word.
    pub fn readable_word<'a>(&'a self, language: &ForeignLanguage) -> &'a str {
        match &self.pronunciation {
            Some(p) if !language.uses_latin_script && !p.is_empty() => p,
            _ => &self.foreign_word,
        }
    }

    /// Edit distance between the English word and the readable form.
    pub fn edit_distance(&self, language: &ForeignLanguage) -> usize {
        glossa_algo::edit_distance(&self.english_word, self.readable_word(language))
    }

    /// Jaro-Winkler similarity between the English word and the readable form.
    pub fn similarity(&self, language: &ForeignLanguage) -> f64 {
        glossa_algo::similarity(&self.english_word, self.readable_word(language))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Read,
    Test,
}

/// One study session for a user in a target language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSession {
    pub id: SessionId,
    pub user_id: String,
    pub language_key: String,
    pub session_type: SessionType,
    pub start_time: DateTime<Utc>,
    /// None while the session is open.
    pub end_time: Option<DateTime<Utc>>,
}

impl LearningSession {
    pub fn new(
        user_id: impl Into<String>,
        language_key: impl Into<String>,
        session_type: SessionType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            language_key: language_key.into(),
            session_type,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Seconds the user spent in this session; 0 while it is still open.
    pub fn duration_secs(&self) -> i64 {
        match self.end_time {
            Some(end) => (end - self.start_time).num_seconds(),
            None => 0,
        }
    }
}

/// Which counter an interaction batch updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackMode {
    Seen,
    Interacted,
    Tested,
    Correct,
}

/// One snapshot of a user's cumulative interaction statistics with a unit,
/// linked to its predecessor.
///
/// Records form an append-only chain per (user, unit). Counters carry
/// forward from the previous record and only ever increase, and only for
/// the session that created the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub id: TraceId,
    pub user_id: String,
    pub session_id: SessionId,
    pub unit_id: UnitId,
    /// Most recent record for the same (user, unit) before this one.
    pub prev: Option<TraceId>,
    pub seen: u32,
    pub interacted: u32,
    pub tested: u32,
    pub correct: u32,
    /// Start time of the owning session, copied at creation (delta basis).
    pub session_start: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TraceRecord {
    /// New chain node for `session`, carrying forward the counters of
    /// `prev` (all zero when there is no baseline).
    pub fn new(session: &LearningSession, unit_id: UnitId, prev: Option<&TraceRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: session.user_id.clone(),
            session_id: session.id,
            unit_id,
            prev: prev.map(|p| p.id),
            seen: prev.map_or(0, |p| p.seen),
            interacted: prev.map_or(0, |p| p.interacted),
            tested: prev.map_or(0, |p| p.tested),
            correct: prev.map_or(0, |p| p.correct),
            session_start: session.start_time,
            created_at: Utc::now(),
        }
    }

    /// Increments the counter named by `mode`.
    pub fn bump(&mut self, mode: TrackMode, count: u32) {
        match mode {
            TrackMode::Seen => self.seen += count,
            TrackMode::Interacted => self.interacted += count,
            TrackMode::Tested => self.tested += count,
            TrackMode::Correct => self.correct += count,
        }
    }

    /// Proportion of tests answered correctly; 0 when never tested.
    pub fn empirical_accuracy(&self) -> f64 {
        if self.tested == 0 {
            return 0.0;
        }
        self.correct as f64 / self.tested as f64
    }
}
