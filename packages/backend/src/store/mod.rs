//! In-process learning store.
//!
//! Owns the unit catalog, session registry and every trace record chain.
//! All interior state sits behind one async `RwLock`; services hold the
//! write guard across a whole read-modify-write batch, which serializes
//! baseline lookups per (user, unit) and rules out two concurrent requests
//! forking a chain from the same baseline.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{
    ForeignLanguage, LearningSession, LearningUnit, SessionId, SessionType, TraceId, TraceRecord,
    TrackMode, UnitId,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("language not found: {0}")]
    LanguageNotFound(String),
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
}

#[derive(Debug, Default)]
pub struct LearningStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    languages: HashMap<String, ForeignLanguage>,
    units: HashMap<UnitId, LearningUnit>,
    sessions: HashMap<SessionId, LearningSession>,
    records: HashMap<TraceId, TraceRecord>,
    /// Record ids per (user, unit), oldest first. The chain itself.
    chains: HashMap<(String, UnitId), Vec<TraceId>>,
}

impl StoreInner {
    pub(crate) fn language(&self, key: &str) -> Option<&ForeignLanguage> {
        self.languages.get(key)
    }

    pub(crate) fn unit(&self, id: UnitId) -> Option<&LearningUnit> {
        self.units.get(&id)
    }

    pub(crate) fn session(&self, id: SessionId) -> Option<&LearningSession> {
        self.sessions.get(&id)
    }

    pub(crate) fn record(&self, id: TraceId) -> Option<&TraceRecord> {
        self.records.get(&id)
    }

    /// Stamps the end time if the session is still open.
    pub(crate) fn end_session(&mut self, id: SessionId) -> Option<&LearningSession> {
        let session = self.sessions.get_mut(&id)?;
        if session.end_time.is_none() {
            session.end_time = Some(Utc::now());
        }
        Some(session)
    }

    /// The record this session already created for the unit, if any.
    pub(crate) fn latest_for_session_unit(
        &self,
        user_id: &str,
        session_id: SessionId,
        unit_id: UnitId,
    ) -> Option<TraceId> {
        self.chains
            .get(&(user_id.to_string(), unit_id))?
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.records
                    .get(id)
                    .is_some_and(|r| r.session_id == session_id)
            })
    }

    /// The user's most recent record for the unit across all sessions.
    pub(crate) fn latest_for_user_unit(
        &self,
        user_id: &str,
        unit_id: UnitId,
    ) -> Option<&TraceRecord> {
        let id = self
            .chains
            .get(&(user_id.to_string(), unit_id))?
            .last()
            .copied()?;
        self.records.get(&id)
    }

    pub(crate) fn bump_record(&mut self, id: TraceId, mode: TrackMode, count: u32) {
        if let Some(record) = self.records.get_mut(&id) {
            record.bump(mode, count);
        }
    }

    /// Appends a record to its (user, unit) chain.
    pub(crate) fn push_record(&mut self, record: TraceRecord) -> TraceId {
        let id = record.id;
        let key = (record.user_id.clone(), record.unit_id);
        self.chains.entry(key).or_default().push(id);
        self.records.insert(id, record);
        id
    }

    /// Seconds between this record's session start and its predecessor's;
    /// 0 when the chain starts here.
    pub(crate) fn delta_secs(&self, record: &TraceRecord) -> i64 {
        let Some(prev) = record.prev.and_then(|id| self.records.get(&id)) else {
            return 0;
        };
        (record.session_start - prev.session_start)
            .num_seconds()
            .max(0)
    }

    /// Most recent record per distinct unit the user has traced in the
    /// language, ordered alphabetically by English word.
    pub(crate) fn unique_latest(&self, user_id: &str, language_key: &str) -> Vec<&TraceRecord> {
        let mut latest: Vec<&TraceRecord> = self
            .chains
            .iter()
            .filter(|((user, unit_id), _)| {
                user == user_id
                    && self
                        .units
                        .get(unit_id)
                        .is_some_and(|u| u.language_key == language_key)
            })
            .filter_map(|(_, ids)| ids.last().and_then(|id| self.records.get(id)))
            .collect();
        latest.sort_by(|a, b| {
            let a_word = self.units.get(&a.unit_id).map(|u| u.english_word.as_str());
            let b_word = self.units.get(&b.unit_id).map(|u| u.english_word.as_str());
            a_word.cmp(&b_word)
        });
        latest
    }
}

impl LearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().await
    }

    pub async fn insert_language(&self, language: ForeignLanguage) {
        let mut inner = self.inner.write().await;
        inner.languages.insert(language.key.clone(), language);
    }

    pub async fn insert_unit(&self, unit: LearningUnit) {
        let mut inner = self.inner.write().await;
        inner.units.insert(unit.id, unit);
    }

    pub async fn language(&self, key: &str) -> Option<ForeignLanguage> {
        self.inner.read().await.languages.get(key).cloned()
    }

    pub async fn unit(&self, id: UnitId) -> Option<LearningUnit> {
        self.inner.read().await.units.get(&id).cloned()
    }

    pub async fn session(&self, id: SessionId) -> Option<LearningSession> {
        self.inner.read().await.sessions.get(&id).cloned()
    }

    /// Starts a session. A new test session first closes any other open
    /// test session the user has, so at most one is open at a time.
    pub async fn start_session(
        &self,
        user_id: &str,
        language_key: &str,
        session_type: SessionType,
    ) -> Result<LearningSession, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.languages.contains_key(language_key) {
            return Err(StoreError::LanguageNotFound(language_key.to_string()));
        }

        if session_type == SessionType::Test {
            let now = Utc::now();
            for session in inner.sessions.values_mut() {
                if session.user_id == user_id
                    && session.session_type == SessionType::Test
                    && session.end_time.is_none()
                {
                    session.end_time = Some(now);
                }
            }
        }

        let session = LearningSession::new(user_id, language_key, session_type);
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    /// Stamps the session's end time if still open; idempotent otherwise.
    pub async fn end_session(&self, id: SessionId) -> Result<LearningSession, StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .end_session(id)
            .cloned()
            .ok_or(StoreError::SessionNotFound(id))
    }

    /// Most recent record for (user, unit), across all sessions.
    pub async fn latest_record(&self, user_id: &str, unit_id: UnitId) -> Option<TraceRecord> {
        self.inner
            .read()
            .await
            .latest_for_user_unit(user_id, unit_id)
            .cloned()
    }

    /// Full chain for (user, unit), oldest first.
    pub async fn chain(&self, user_id: &str, unit_id: UnitId) -> Vec<TraceRecord> {
        let inner = self.inner.read().await;
        inner
            .chains
            .get(&(user_id.to_string(), unit_id))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.records.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Seconds between a record's session start and its predecessor's.
    pub async fn delta_secs(&self, record: &TraceRecord) -> i64 {
        self.inner.read().await.delta_secs(record)
    }

    /// Number of distinct units the user has traced in the language.
    pub async fn distinct_traced_units(&self, user_id: &str, language_key: &str) -> usize {
        self.inner
            .read()
            .await
            .unique_latest(user_id, language_key)
            .len()
    }
}
